use glam::Vec2;

use crate::world::geometry::{Level, Node, NodeId, SubsectorId};

/// Set on a raw child index when it names a subsector rather than a node.
pub const NF_SUBSECTOR: u16 = 0x8000;

pub const CHILD_MASK: u16 = 0x7FFF;

/// A BSP child: either another node or a leaf (subsector).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Node(NodeId),
    Subsector(SubsectorId),
}

impl NodeRef {
    /// Decode the 16-bit child index used by the map format.
    ///
    /// All-ones (`-1` read as a signed short) is written by some node
    /// builders for maps with a single leaf and means subsector 0.
    #[inline]
    pub fn from_raw(raw: u16) -> Self {
        if raw & NF_SUBSECTOR == 0 {
            NodeRef::Node(raw)
        } else if raw == u16::MAX {
            NodeRef::Subsector(0)
        } else {
            NodeRef::Subsector(raw & CHILD_MASK)
        }
    }

    #[inline]
    pub fn to_raw(self) -> u16 {
        match self {
            NodeRef::Node(n) => n,
            NodeRef::Subsector(ss) => ss | NF_SUBSECTOR,
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Level – BSP helpers
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// Root of the tree: the last node, or leaf 0 on a node-less map.
    #[inline]
    pub fn bsp_root(&self) -> NodeRef {
        match self.nodes.len() {
            0 => NodeRef::Subsector(0),
            n => NodeRef::Node((n - 1) as NodeId),
        }
    }

    /// Walk the BSP and return the subsector id containing `p`.
    pub fn locate_subsector(&self, p: Vec2) -> SubsectorId {
        let mut at = self.bsp_root();
        loop {
            match at {
                NodeRef::Subsector(ss) => return ss,
                NodeRef::Node(n) => {
                    let node = &self.nodes[n as usize];
                    at = node.child[node.point_side(p)];
                }
            }
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Node geometry helpers
// ──────────────────────────────────────────────────────────────────────────
impl Node {
    #[inline(always)]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline(always)]
    pub fn delta(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }

    /// 0 = *front* of splitter, 1 = *back*.
    ///
    /// Points exactly on the line report the back side.
    #[inline(always)]
    pub fn point_side(&self, p: Vec2) -> usize {
        let rel = p - self.origin();
        if self.dx * rel.y < self.dy * rel.x { 0 } else { 1 }
    }

    /// Unsigned perpendicular distance of `p` to the partition, scaled by
    /// the (unnormalised) length of the partition direction.
    #[inline]
    pub fn scaled_dist(&self, p: Vec2) -> f32 {
        let rel = p - self.origin();
        let normal = Vec2::new(-self.dy, self.dx);
        rel.dot(normal).abs()
    }
}

/*──────────────────────────── 2-D segment tests ────────────────────────────*/

#[inline]
fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

#[inline]
fn within_bounds(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// True if segment `a1‥a2` crosses or touches segment `b1‥b2`.
pub fn lines_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);

    let straddles = |p: f32, q: f32| (p > 0.0 && q < 0.0) || (p < 0.0 && q > 0.0);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    // touching / collinear cases
    (d1 == 0.0 && within_bounds(b1, b2, a1))
        || (d2 == 0.0 && within_bounds(b1, b2, a2))
        || (d3 == 0.0 && within_bounds(a1, a2, b1))
        || (d4 == 0.0 && within_bounds(a1, a2, b2))
}

// ──────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::geometry::Aabb;
    use crate::world::test_map;
    use glam::vec2;

    fn vertical_node() -> Node {
        Node {
            x: 128.0,
            y: 0.0,
            dx: 0.0,
            dy: 128.0,
            bbox: [Aabb::EMPTY; 2],
            child: [NodeRef::Subsector(1), NodeRef::Subsector(0)],
        }
    }

    #[test]
    fn raw_child_decoding() {
        assert_eq!(NodeRef::from_raw(5), NodeRef::Node(5));
        assert_eq!(NodeRef::from_raw(NF_SUBSECTOR | 7), NodeRef::Subsector(7));
        assert_eq!(NodeRef::from_raw(NF_SUBSECTOR), NodeRef::Subsector(0));
        // -1 is an alias of leaf 0, not leaf 0x7FFF
        assert_eq!(NodeRef::from_raw(0xFFFF), NodeRef::Subsector(0));
        assert_eq!(NodeRef::Subsector(3).to_raw(), 0x8003);
    }

    #[test]
    fn point_side_of_vertical_splitter() {
        let node = vertical_node();
        assert_eq!(node.point_side(vec2(200.0, 64.0)), 0);
        assert_eq!(node.point_side(vec2(20.0, 64.0)), 1);
        // on the line → back
        assert_eq!(node.point_side(vec2(128.0, 64.0)), 1);
    }

    #[test]
    fn scaled_dist_is_unsigned() {
        let node = vertical_node();
        assert_eq!(node.scaled_dist(vec2(100.0, 10.0)), 28.0 * 128.0);
        assert_eq!(node.scaled_dist(vec2(160.0, 90.0)), 32.0 * 128.0);
    }

    #[test]
    fn segment_crossing() {
        let a1 = vec2(0.0, 0.0);
        let a2 = vec2(10.0, 10.0);
        assert!(lines_intersect(a1, a2, vec2(0.0, 10.0), vec2(10.0, 0.0)));
        assert!(!lines_intersect(a1, a2, vec2(20.0, 0.0), vec2(20.0, 10.0)));
        // parallel, disjoint
        assert!(!lines_intersect(a1, a2, vec2(1.0, 0.0), vec2(11.0, 10.0)));
        // touching at an endpoint counts
        assert!(lines_intersect(a1, a2, vec2(10.0, 10.0), vec2(20.0, 0.0)));
        // lines would cross if extended, segments do not
        assert!(!lines_intersect(a1, vec2(1.0, 1.0), vec2(0.0, 10.0), vec2(10.0, 0.0)));
    }

    #[test]
    fn locate_subsector_in_two_rooms() {
        let lvl = test_map::two_rooms(test_map::Divider::Open);
        assert_eq!(lvl.locate_subsector(vec2(40.0, 64.0)), test_map::LEFT);
        assert_eq!(lvl.locate_subsector(vec2(200.0, 64.0)), test_map::RIGHT);
    }
}
