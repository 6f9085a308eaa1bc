//! Pushes sprite fragments down the BSP, cutting them where they straddle
//! a partition and the cut is allowed.

use glam::Vec2;
use log::trace;

use super::{FrameStats, SpriteFrag, oracle::can_split, store::FragStore};
use crate::config::SpriteConfig;
use crate::world::{FrameVisibility, Level, NodeRef};

pub(crate) struct Splitter<'a> {
    pub level: &'a Level,
    pub vis: &'a FrameVisibility,
    pub cfg: &'a SpriteConfig,
    pub store: &'a mut FragStore,
    pub stats: &'a mut FrameStats,
}

impl Splitter<'_> {
    /// File `frag` (and the pieces it is cut into) below `at`.
    ///
    /// `anchor` is the owning thing's position; when a cut is refused the
    /// whole fragment goes to the anchor's side of the partition.
    pub fn add_frag(&mut self, at: NodeRef, frag: SpriteFrag, anchor: Vec2, depth: u32) {
        let n = match at {
            NodeRef::Subsector(ss) => {
                match self.vis.draw_index(ss) {
                    Some(draw_idx) => {
                        self.store.push_front(draw_idx, frag);
                        self.stats.fragments += 1;
                    }
                    None => self.stats.culled += 1,
                }
                return;
            }
            NodeRef::Node(n) => n,
        };

        let node = &self.level.nodes[n as usize];
        let side1 = node.point_side(frag.p1);
        let side2 = node.point_side(frag.p2);

        if side1 == side2 {
            self.add_frag(node.child[side1], frag, anchor, depth);
            return;
        }

        let d1 = node.scaled_dist(frag.p1);
        let d2 = node.scaled_dist(frag.p2);
        let sum = d1 + d2;

        let t = if depth >= self.cfg.max_split_depth {
            self.stats.capped += 1;
            None
        } else {
            let t = (sum > 0.0 && sum.is_finite())
                .then(|| (d1 / sum).clamp(0.0, 1.0))
                .filter(|&t| {
                    let line = frag.test_line(t, self.cfg.split_test_bias);
                    can_split(self.level, self.vis, at, &line)
                });
            if t.is_none() {
                self.stats.vetoed += 1;
            }
            t
        };

        match t {
            Some(t) => {
                trace!("node {n}: split at t={t:.3}");
                self.stats.splits += 1;
                let (a, b) = frag.split_at(t);
                self.add_frag(node.child[side1], a, anchor, depth + 1);
                self.add_frag(node.child[side2], b, anchor, depth + 1);
            }
            None => {
                let side = node.point_side(anchor);
                trace!("node {n}: split refused, keeping fragment on side {side}");
                self.add_frag(node.child[side], frag, anchor, depth);
            }
        }
    }
}
