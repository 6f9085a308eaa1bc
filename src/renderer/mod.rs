//! Rendering abstraction layer.
//!
//! *The sprite code never touches a pixel buffer directly.*
//! It selects a [`DrawPipeline`] and submits textured quads to a type that
//! implements [`DrawSink`].
//!
//! * A GPU back-end turns the calls into vertex batches.
//! * [`DrawList`] just records them, which is what the tests and the debug
//!   viewer use.

use glam::{Vec2, Vec3};

use crate::world::{Rgb, TexWindow};

pub mod sprites;

/// How a batch of geometry is blended into the frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DrawPipeline {
    /// Opaque, texel colour 0 discarded.
    SpriteMasked,
    SpriteAdditive,
    SpriteSubtractive,
    /// 50/50 blend with the framebuffer.
    SpriteAlpha,
    /// Screen-space overlay (weapon).
    Ui,
    UiAdditive,
}

/// Per-channel blend strength; 128 = 100%.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SemiTransparency {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SemiTransparency {
    pub const FULL: SemiTransparency = SemiTransparency::new(128, 128, 128, 128);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for SemiTransparency {
    fn default() -> Self {
        Self::FULL
    }
}

/// One corner of a world-space quad.  `pos` is in render space (y up).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldVertex {
    pub pos: Vec3,
    /// Texel coordinates relative to the atlas window.
    pub uv: Vec2,
    pub color: Rgb,
}

/// Textured quad in the 3D view.
///
/// Corners run bottom-left, top-left, top-right, bottom-right.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldQuad {
    pub corners: [WorldVertex; 4],
    pub window: TexWindow,
    pub st_mul: SemiTransparency,
}

/// Axis-aligned screen-space sprite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UiSprite {
    pub x: i32,
    pub y: i32,
    pub w: u16,
    pub h: u16,
    /// Top-left texel inside `window`.
    pub u: u16,
    pub v: u16,
    pub window: TexWindow,
    pub color: Rgb,
    pub alpha: u8,
}

/// Destination for sprite draw calls.
///
/// Every `add_*` call uses the pipeline selected by the most recent
/// `set_pipeline`.
pub trait DrawSink {
    fn set_pipeline(&mut self, pipeline: DrawPipeline);

    fn add_world_quad(&mut self, quad: &WorldQuad);

    fn add_ui_sprite(&mut self, sprite: &UiSprite);
}

/// What a [`DrawList`] recorded.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Pipeline(DrawPipeline),
    World(WorldQuad),
    Ui(UiSprite),
}

/// [`DrawSink`] that keeps every call in submission order.
#[derive(Default, Debug)]
pub struct DrawList {
    pub calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Recorded world quads, each with the pipeline active when it was added.
    pub fn world_quads(&self) -> impl Iterator<Item = (DrawPipeline, &WorldQuad)> + '_ {
        let mut pipe = None;
        self.calls.iter().filter_map(move |c| match c {
            DrawCall::Pipeline(p) => {
                pipe = Some(*p);
                None
            }
            DrawCall::World(q) => pipe.map(|p| (p, q)),
            DrawCall::Ui(_) => None,
        })
    }

    pub fn ui_sprites(&self) -> impl Iterator<Item = (DrawPipeline, &UiSprite)> + '_ {
        let mut pipe = None;
        self.calls.iter().filter_map(move |c| match c {
            DrawCall::Pipeline(p) => {
                pipe = Some(*p);
                None
            }
            DrawCall::Ui(s) => pipe.map(|p| (p, s)),
            DrawCall::World(_) => None,
        })
    }
}

impl DrawSink for DrawList {
    fn set_pipeline(&mut self, pipeline: DrawPipeline) {
        self.calls.push(DrawCall::Pipeline(pipeline));
    }

    fn add_world_quad(&mut self, quad: &WorldQuad) {
        self.calls.push(DrawCall::World(*quad));
    }

    fn add_ui_sprite(&mut self, sprite: &UiSprite) {
        self.calls.push(DrawCall::Ui(*sprite));
    }
}
