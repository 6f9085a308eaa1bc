pub mod bsp;
pub mod builder;
pub mod camera;
pub mod geometry;
pub mod light;
pub mod texture;
pub mod visibility;

#[cfg(test)]
pub(crate) mod test_map;

pub use bsp::{NodeRef, lines_intersect};
pub use builder::{LevelBuilder, LevelError};
pub use camera::Camera;
pub use geometry::{
    Aabb, Level, Linedef, LinedefFlags, LinedefId, Node, NodeId, Sector, SectorId, Seg,
    SegmentId, Subsector, SubsectorId, Vertex, VertexId,
};
pub use light::{LIGHT_INTENSITY_MAX, Rgb};
pub use texture::{NO_TEXTURE, TexWindow, Texture, TextureBank, TextureError, TextureId};
pub use visibility::{FrameVisibility, SegFlags};
