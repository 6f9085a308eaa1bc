//! Sprite-fragment splitting and depth ordering for a BSP level renderer.
//!
//! Each frame [`renderer::sprites::SpriteFrags::build_frame`] cuts every
//! visible thing's billboard along the BSP partitions it straddles and files
//! the pieces under their subsectors.  The frame driver then calls
//! [`renderer::sprites::SpriteFrags::draw_subsector`] after each
//! subsector's walls and floors.

pub mod config;
pub mod defs;
pub mod renderer;
pub mod sim;
pub mod world;

pub use config::SpriteConfig;
