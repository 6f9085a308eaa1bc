// ──────────────────────────────────────────────────────────────────────────
// world/builder.rs
//
//  *   vertices / sectors / linedefs        ──╮
//  *   subsectors as (linedef, side) lists    │   --->  world::geometry::Level
//  *   nodes (children before parents)        │          + node bounding boxes
//                                             ╯
// ──────────────────────────────────────────────────────────────────────────

use glam::Vec2;
use thiserror::Error;

use crate::world::{
    bsp::NodeRef,
    geometry::{
        Aabb, Level, Linedef, LinedefFlags, LinedefId, Node, NodeId, Sector, SectorId, Seg,
        SegmentId, Subsector, SubsectorId, Vertex, VertexId,
    },
};

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LevelError {
    #[error("linedef {linedef} references missing vertex {vertex}")]
    BadVertex { linedef: LinedefId, vertex: VertexId },

    #[error("linedef {linedef} references missing sector {sector}")]
    BadSector { linedef: LinedefId, sector: SectorId },

    #[error("subsector {subsector} references missing linedef {linedef}")]
    BadLinedef { subsector: SubsectorId, linedef: LinedefId },

    #[error("subsector {subsector} uses the missing back side of one-sided linedef {linedef}")]
    NoBackSide { subsector: SubsectorId, linedef: LinedefId },

    #[error("subsector {0} has no segs")]
    EmptySubsector(SubsectorId),

    #[error("node {node} has child {child:?} that does not exist or is not built yet")]
    BadChild { node: NodeId, child: NodeRef },
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Assembles a [`Level`] from already-partitioned map data.
///
/// Nothing is validated until [`LevelBuilder::build`], so ids may be
/// handed out in any order as long as they resolve in the end.  Nodes
/// follow the map-format rule: a node may only reference nodes created
/// before it, and the last node is the root.
#[derive(Default)]
pub struct LevelBuilder {
    name: String,
    vertices: Vec<Vertex>,
    linedefs: Vec<Linedef>,
    sectors: Vec<Sector>,
    subsectors: Vec<Vec<(LinedefId, u16)>>,
    nodes: Vec<(Vec2, Vec2, [NodeRef; 2])>,
}

impl LevelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn vertex(&mut self, x: f32, y: f32) -> VertexId {
        self.vertices.push(Vertex { pos: Vec2::new(x, y) });
        (self.vertices.len() - 1) as VertexId
    }

    pub fn sector(&mut self, sector: Sector) -> SectorId {
        self.sectors.push(sector);
        (self.sectors.len() - 1) as SectorId
    }

    /// Add a linedef.  `front` is the sector on the right walking v1 → v2.
    /// `TWO_SIDED` is set automatically when `back` is present.
    pub fn linedef(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        mut flags: LinedefFlags,
        front: SectorId,
        back: Option<SectorId>,
    ) -> LinedefId {
        flags.set(LinedefFlags::TWO_SIDED, back.is_some());
        self.linedefs.push(Linedef {
            v1,
            v2,
            flags,
            front_sector: front,
            back_sector: back,
        });
        (self.linedefs.len() - 1) as LinedefId
    }

    /// Add a subsector bounded by the given linedef sides
    /// (side 0 = the linedef's front, 1 = its back).
    pub fn subsector(&mut self, sides: &[(LinedefId, u16)]) -> NodeRef {
        self.subsectors.push(sides.to_vec());
        NodeRef::Subsector((self.subsectors.len() - 1) as SubsectorId)
    }

    /// Add a node whose partition starts at `from` and runs along `delta`.
    pub fn node(&mut self, from: Vec2, delta: Vec2, front: NodeRef, back: NodeRef) -> NodeRef {
        self.nodes.push((from, delta, [front, back]));
        NodeRef::Node((self.nodes.len() - 1) as NodeId)
    }

    pub fn build(self) -> Result<Level, LevelError> {
        /*----- 1. Linedef references -----------------------------------------*/
        for (i, ld) in self.linedefs.iter().enumerate() {
            let linedef = i as LinedefId;
            for vertex in [ld.v1, ld.v2] {
                if vertex as usize >= self.vertices.len() {
                    return Err(LevelError::BadVertex { linedef, vertex });
                }
            }
            for sector in std::iter::once(ld.front_sector).chain(ld.back_sector) {
                if sector as usize >= self.sectors.len() {
                    return Err(LevelError::BadSector { linedef, sector });
                }
            }
        }

        /*----- 2. Segs + subsectors ------------------------------------------*/
        let mut segs: Vec<Seg> = Vec::new();
        let mut subsectors: Vec<Subsector> = Vec::with_capacity(self.subsectors.len());
        for (i, sides) in self.subsectors.iter().enumerate() {
            let subsector = i as SubsectorId;
            if sides.is_empty() {
                return Err(LevelError::EmptySubsector(subsector));
            }
            let first_seg = segs.len() as SegmentId;
            for &(linedef, dir) in sides {
                let ld = self
                    .linedefs
                    .get(linedef as usize)
                    .ok_or(LevelError::BadLinedef { subsector, linedef })?;
                let seg = seg_from(ld, linedef, dir)
                    .ok_or(LevelError::NoBackSide { subsector, linedef })?;
                segs.push(seg);
            }
            subsectors.push(Subsector {
                seg_count: sides.len() as u16,
                first_seg,
                sector: segs[first_seg as usize].front_sector,
            });
        }

        /*----- 3. Nodes, bottom-up bounding boxes ----------------------------*/
        let ss_bbox: Vec<Aabb> = subsectors
            .iter()
            .map(|ss| {
                let start = ss.first_seg as usize;
                let mut bb = Aabb::EMPTY;
                for seg in &segs[start..start + ss.seg_count as usize] {
                    bb.add_point(self.vertices[seg.v1 as usize].pos);
                    bb.add_point(self.vertices[seg.v2 as usize].pos);
                }
                bb
            })
            .collect();

        let mut nodes: Vec<Node> = Vec::with_capacity(self.nodes.len());
        let mut node_bbox: Vec<Aabb> = Vec::with_capacity(self.nodes.len());
        for (i, &(from, delta, child)) in self.nodes.iter().enumerate() {
            let mut bbox = [Aabb::EMPTY; 2];
            for (side, c) in child.iter().enumerate() {
                bbox[side] = match *c {
                    NodeRef::Node(n) if (n as usize) < i => node_bbox[n as usize],
                    NodeRef::Subsector(ss) if (ss as usize) < ss_bbox.len() => ss_bbox[ss as usize],
                    _ => {
                        return Err(LevelError::BadChild {
                            node: i as NodeId,
                            child: *c,
                        });
                    }
                };
            }
            node_bbox.push(bbox[0].union(bbox[1]));
            nodes.push(Node {
                x: from.x,
                y: from.y,
                dx: delta.x,
                dy: delta.y,
                bbox,
                child,
            });
        }

        Ok(Level {
            name: self.name,
            vertices: self.vertices,
            linedefs: self.linedefs,
            segs,
            subsectors,
            nodes,
            sectors: self.sectors,
        })
    }
}

/// Seg covering the whole of `ld`, seen from side `dir`.
fn seg_from(ld: &Linedef, linedef: LinedefId, dir: u16) -> Option<Seg> {
    let (v1, v2, front, back) = if dir == 0 {
        (ld.v1, ld.v2, ld.front_sector, ld.back_sector)
    } else {
        (ld.v2, ld.v1, ld.back_sector?, Some(ld.front_sector))
    };
    Some(Seg {
        v1,
        v2,
        linedef,
        front_sector: front,
        back_sector: back,
    })
}

/*──────────────────────────────── Tests ───────────────────────────────*/
