//! Sprite definitions: which image to show for a sprite, frame and
//! viewing direction.

use std::f32::consts::{FRAC_PI_4, FRAC_PI_8, TAU};

use crate::defs::flags::FF_FRAMEMASK;
use crate::world::TextureId;

pub type SpriteId = u16;

/// Sprite id used by things with nothing to draw (the `S_NULL` state).
pub const NULL_SPRITE: SpriteId = SpriteId::MAX;

/// One animation frame.  Frames without rotations only use slot 0.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteFrame {
    pub rotate: bool,
    pub lump: [TextureId; 8],
    pub flip: [bool; 8],
}

impl SpriteFrame {
    /// Frame that looks the same from every direction.
    pub fn single(tex: TextureId, flip: bool) -> Self {
        Self {
            rotate: false,
            lump: [tex; 8],
            flip: [flip; 8],
        }
    }

    /// Frame with one image per 45° octant, slot 0 facing the viewer.
    pub fn rotated(lump: [TextureId; 8], flip: [bool; 8]) -> Self {
        Self {
            rotate: true,
            lump,
            flip,
        }
    }

    /// Image and flip flag for a thing facing `thing_angle`, seen along
    /// `view_angle` (the direction from the viewer to the thing).
    pub fn variant(&self, view_angle: f32, thing_angle: f32) -> (TextureId, bool) {
        let idx = if self.rotate {
            rotation_index(view_angle, thing_angle)
        } else {
            0
        };
        (self.lump[idx], self.flip[idx])
    }
}

/// Octant 0‥7 of the relative viewing angle, biased by half a step so each
/// image covers ±22.5° around its own direction.
#[inline]
pub fn rotation_index(view_angle: f32, thing_angle: f32) -> usize {
    let rel = (view_angle - thing_angle + FRAC_PI_8 * 9.0).rem_euclid(TAU);
    ((rel / FRAC_PI_4) as usize) & 7
}

#[derive(Clone, Debug, Default)]
pub struct SpriteDef {
    pub frames: Vec<SpriteFrame>,
}

/// All sprite definitions of the game, indexed by [`SpriteId`].
#[derive(Clone, Debug, Default)]
pub struct SpriteTable {
    defs: Vec<SpriteDef>,
}

impl SpriteTable {
    pub fn push(&mut self, def: SpriteDef) -> SpriteId {
        self.defs.push(def);
        (self.defs.len() - 1) as SpriteId
    }

    #[inline]
    pub fn get(&self, sprite: SpriteId) -> Option<&SpriteDef> {
        self.defs.get(sprite as usize)
    }

    /// Frame for a raw frame number (flag bits are ignored).
    #[inline]
    pub fn frame(&self, sprite: SpriteId, frame: u16) -> Option<&SpriteFrame> {
        self.get(sprite)?.frames.get((frame & FF_FRAMEMASK) as usize)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
