use std::ops::Range;

use bitflags::bitflags;
use glam::Vec2;

use crate::world::{bsp::NodeRef, light::Rgb};

pub type SubsectorId = u16;
pub type LinedefId = u16;
pub type SegmentId = u16;
pub type VertexId = u16;
pub type SectorId = u16;
pub type NodeId = u16;

/// Runtime snapshot of one map (immutable after load).
#[derive(Debug)]
pub struct Level {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub linedefs: Vec<Linedef>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub sectors: Vec<Sector>,
}

/*--------------------------- linedefs -------------------------------*/

bitflags! {
    /// Linedef flags, PlayStation layout (the low byte matches PC Doom).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LinedefFlags: u16 {
        const IMPASSABLE       = 0x0001;
        const BLOCK_MONSTERS   = 0x0002;
        const TWO_SIDED        = 0x0004;
        const UPPER_UNPEGGED   = 0x0008;
        const LOWER_UNPEGGED   = 0x0010;
        const SECRET           = 0x0020;
        const BLOCK_SOUND      = 0x0040;
        const DONT_DRAW        = 0x0080;
        const MAPPED           = 0x0100;
        // mid texture has see-through (masked) pixels
        const MID_MASKED       = 0x0200;
        // mid texture is drawn semi-transparent
        const MID_TRANSLUCENT  = 0x0400;
        const BLOCK_PROJECTILE = 0x0800;
    }
}

#[derive(Clone, Debug)]
pub struct Linedef {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: LinedefFlags,
    /// Sector on the right-hand side (walking v1 → v2).
    pub front_sector: SectorId,
    /// Sector on the left-hand side; `None` for a one-sided wall.
    pub back_sector: Option<SectorId>,
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: Vec2,
}

/// One wall piece bounding a subsector.
#[derive(Clone, Debug)]
pub struct Seg {
    pub v1: VertexId,
    pub v2: VertexId,
    pub linedef: LinedefId,
    pub front_sector: SectorId,
    pub back_sector: Option<SectorId>,
}

#[derive(Clone, Debug)]
pub struct Subsector {
    pub seg_count: u16,
    pub first_seg: SegmentId,
    pub sector: SectorId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box that contains nothing; `union` with anything yields that thing.
    pub const EMPTY: Aabb = Aabb {
        min: Vec2::splat(f32::INFINITY),
        max: Vec2::splat(f32::NEG_INFINITY),
    };

    #[inline]
    pub fn add_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn union(self, other: Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Internal BSP node: an oriented partition line and its two subtrees.
#[derive(Clone, Debug)]
pub struct Node {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    /// Bounds of everything under `child[0]` / `child[1]`.
    pub bbox: [Aabb; 2],
    /// 0 = front, 1 = back.
    pub child: [NodeRef; 2],
}

#[derive(Clone, Debug)]
pub struct Sector {
    pub floor_h: f32,
    pub ceil_h: f32,
    /// Heights the renderer actually draws this frame (differ from the
    /// simulation heights while a mover is being interpolated).
    pub floor_draw_h: f32,
    pub ceil_draw_h: f32,
    /// 0‥255
    pub light_level: u8,
    pub floor_color: Rgb,
    pub ceil_color: Rgb,
}

impl Sector {
    /// Plain sector with white light and draw heights equal to the real ones.
    pub fn new(floor_h: f32, ceil_h: f32, light_level: u8) -> Self {
        Self {
            floor_h,
            ceil_h,
            floor_draw_h: floor_h,
            ceil_draw_h: ceil_h,
            light_level,
            floor_color: Rgb::WHITE,
            ceil_color: Rgb::WHITE,
        }
    }

    pub fn with_colors(mut self, floor_color: Rgb, ceil_color: Rgb) -> Self {
        self.floor_color = floor_color;
        self.ceil_color = ceil_color;
        self
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Level – lookup helpers
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// Index range of the segs bounding subsector `ss`.
    #[inline]
    pub fn segs_of_subsector(&self, ss: SubsectorId) -> Range<usize> {
        let ss = &self.subsectors[ss as usize];
        let start = ss.first_seg as usize;
        start..start + ss.seg_count as usize
    }

    /// Endpoints of the *whole* linedef a seg was cut from.
    #[inline]
    pub fn linedef_line(&self, ld: LinedefId) -> (Vec2, Vec2) {
        let ld = &self.linedefs[ld as usize];
        (
            self.vertices[ld.v1 as usize].pos,
            self.vertices[ld.v2 as usize].pos,
        )
    }

    #[inline]
    pub fn seg_line(&self, seg: SegmentId) -> (Vec2, Vec2) {
        let seg = &self.segs[seg as usize];
        (
            self.vertices[seg.v1 as usize].pos,
            self.vertices[seg.v2 as usize].pos,
        )
    }

    #[inline]
    pub fn sector_of_subsector(&self, ss: SubsectorId) -> &Sector {
        &self.sectors[self.subsectors[ss as usize].sector as usize]
    }
}
