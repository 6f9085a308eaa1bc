//! Per-frame visibility: which subsectors get drawn this frame (in draw
//! order) and which segs contribute visible wall columns.
//!
//! The surrounding renderer normally fills this while it walks the BSP
//! for walls.  [`FrameVisibility::collect`] is a stand-alone version of
//! that walk: front-to-back, far side culled by its bounding box.

use bitflags::bitflags;
use glam::Vec2;

use crate::world::{
    bsp::NodeRef,
    camera::Camera,
    geometry::{Aabb, Level, SegmentId, SubsectorId},
};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SegFlags: u8 {
        /// Seg put at least one wall column on screen this frame.
        const VISIBLE_COLS = 0x01;
    }
}

#[derive(Default, Debug)]
pub struct FrameVisibility {
    draw_subsecs: Vec<SubsectorId>,
    /// subsector → index into `draw_subsecs`
    draw_idx: Vec<Option<u16>>,
    seg_flags: Vec<SegFlags>,
}

impl FrameVisibility {
    /// Forget last frame and size the tables for `level`.
    pub fn reset(&mut self, level: &Level) {
        self.draw_subsecs.clear();
        self.draw_idx.clear();
        self.draw_idx.resize(level.subsectors.len(), None);
        self.seg_flags.clear();
        self.seg_flags.resize(level.segs.len(), SegFlags::empty());
    }

    /// Append `ss` to the draw list and return its draw index.
    pub fn add_subsector(&mut self, ss: SubsectorId) -> u16 {
        debug_assert!(
            self.draw_idx[ss as usize].is_none(),
            "subsector {ss} added twice"
        );
        let idx = self.draw_subsecs.len() as u16;
        self.draw_subsecs.push(ss);
        self.draw_idx[ss as usize] = Some(idx);
        idx
    }

    #[inline]
    pub fn mark_seg_visible(&mut self, seg: SegmentId) {
        self.seg_flags[seg as usize].insert(SegFlags::VISIBLE_COLS);
    }

    #[inline]
    pub fn seg_visible(&self, seg: SegmentId) -> bool {
        self.seg_flags[seg as usize].contains(SegFlags::VISIBLE_COLS)
    }

    /// Draw index of `ss`, or `None` when it is not drawn this frame.
    #[inline]
    pub fn draw_index(&self, ss: SubsectorId) -> Option<u16> {
        self.draw_idx[ss as usize]
    }

    #[inline]
    pub fn draw_subsectors(&self) -> &[SubsectorId] {
        &self.draw_subsecs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.draw_subsecs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.draw_subsecs.is_empty()
    }

    /// Rebuild from scratch for `camera`.
    pub fn collect(&mut self, level: &Level, camera: &Camera) {
        self.reset(level);
        self.walk_bsp(level.bsp_root(), level, camera);
    }

    fn walk_bsp(&mut self, at: NodeRef, level: &Level, camera: &Camera) {
        let n = match at {
            NodeRef::Subsector(ss) => {
                self.visit_subsector(ss, level, camera);
                return;
            }
            NodeRef::Node(n) => n,
        };

        // Internal node ──────
        let node = &level.nodes[n as usize];
        let front = node.point_side(camera.pos().truncate()); // 0: front, 1: back

        // Near side first …
        self.walk_bsp(node.child[front], level, camera);

        // … far side only if its bounding box might be visible.
        if node.bbox[front ^ 1].in_fov(camera) {
            self.walk_bsp(node.child[front ^ 1], level, camera);
        }
    }

    fn visit_subsector(&mut self, ss: SubsectorId, level: &Level, camera: &Camera) {
        self.add_subsector(ss);
        for seg in level.segs_of_subsector(ss) {
            let seg = seg as SegmentId;
            if faces_camera(level, seg, camera) {
                self.mark_seg_visible(seg);
            }
        }
    }
}

/// True if the viewer is on the front (right-hand) side of `seg`.
fn faces_camera(level: &Level, seg: SegmentId, cam: &Camera) -> bool {
    let (a, b) = level.seg_line(seg);
    let wall = b - a;
    let n = Vec2::new(wall.y, -wall.x); // right-hand normal
    n.dot(cam.pos().truncate() - a) > 0.0
}

// ──────────────────────────────────────────────────────────────────────────
//                       Aabb view helpers
// ──────────────────────────────────────────────────────────────────────────
impl Aabb {
    /// Conservative test whether any part of the box lies inside the
    /// camera's horizontal field of view.
    pub fn in_fov(&self, cam: &Camera) -> bool {
        use std::f32::consts::PI;

        let half_fov = cam.fov * 0.5;
        let eye = cam.pos().truncate();

        // Fast accept when camera inside bbox
        if self.contains(eye) {
            return true;
        }

        // collect the four corner angles relative to the view direction
        let corners = [
            Vec2::new(self.min.x, self.min.y),
            Vec2::new(self.max.x, self.min.y),
            Vec2::new(self.min.x, self.max.y),
            Vec2::new(self.max.x, self.max.y),
        ];

        let mut left = PI;
        let mut right = -PI;
        let mut pos_min = PI; // smallest non-negative angle
        let mut neg_max = -PI; // largest negative angle
        for c in corners {
            let v = c - eye;
            let mut a = v.y.atan2(v.x) - cam.yaw;
            if a > PI {
                a -= 2.0 * PI;
            }
            if a < -PI {
                a += 2.0 * PI;
            }
            left = left.min(a);
            right = right.max(a);
            if a >= 0.0 {
                pos_min = pos_min.min(a);
            } else {
                neg_max = neg_max.max(a);
            }
        }

        if right - left > PI {
            // Wedge crosses the ±π seam behind the viewer: the box covers
            // [pos_min, π] ∪ [-π, neg_max].
            return pos_min <= half_fov || neg_max >= -half_fov;
        }

        right >= -half_fov && left <= half_fov
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
