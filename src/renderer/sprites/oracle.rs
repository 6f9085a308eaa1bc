//! Decides whether a sprite may be cut at a BSP partition.
//!
//! A cut is refused where the piece on the far side would show through
//! geometry that should hide it: solid walls, masked or translucent mid
//! textures, and the upper/lower parts of visible two-sided walls.

use log::trace;

use super::SplitTestLine;
use crate::world::{
    FrameVisibility, Level, LinedefFlags, NodeRef, SegmentId, lines_intersect,
};

/// `true` if `line` crosses no blocking wall anywhere below `at`.
pub(crate) fn can_split(level: &Level, vis: &FrameVisibility, at: NodeRef, line: &SplitTestLine) -> bool {
    match at {
        NodeRef::Subsector(ss) => level
            .segs_of_subsector(ss)
            .all(|seg| seg_permits(level, vis, seg as SegmentId, line)),
        NodeRef::Node(n) => {
            let node = &level.nodes[n as usize];
            let side1 = node.point_side(line.p1);
            let side2 = node.point_side(line.p2);

            if !can_split(level, vis, node.child[side1], line) {
                return false;
            }
            side1 == side2 || can_split(level, vis, node.child[side2], line)
        }
    }
}

fn seg_permits(level: &Level, vis: &FrameVisibility, seg_id: SegmentId, line: &SplitTestLine) -> bool {
    let seg = &level.segs[seg_id as usize];
    let (a, b) = level.linedef_line(seg.linedef);
    if !lines_intersect(a, b, line.p1, line.p2) {
        return true;
    }

    let Some(back) = seg.back_sector else {
        trace!("split blocked by one-sided seg {seg_id}");
        return false;
    };

    let flags = level.linedefs[seg.linedef as usize].flags;
    if flags.intersects(LinedefFlags::MID_MASKED | LinedefFlags::MID_TRANSLUCENT) {
        trace!("split blocked by mid texture on seg {seg_id}");
        return false;
    }

    // Off-screen two-sided walls never block: nobody sees the cut.
    if !vis.seg_visible(seg_id) {
        return true;
    }

    let front = &level.sectors[seg.front_sector as usize];
    let back = &level.sectors[back as usize];
    let gap_bottom = front.floor_draw_h.max(back.floor_draw_h);
    let gap_top = front.ceil_draw_h.min(back.ceil_draw_h);
    line.y >= gap_bottom && line.y <= gap_top
}
