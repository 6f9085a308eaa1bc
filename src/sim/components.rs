use glam::{Vec2, Vec3};

use crate::defs::{FF_FULLBRIGHT, MobjFlags, NULL_SPRITE, SpriteId};
use crate::world::SubsectorId;

/// World‑space position.  z is separate to match Doom’s 2½‑D maths.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2, pub f32);

impl Position {
    #[inline]
    pub fn xyz(&self) -> Vec3 {
        self.0.extend(self.1)
    }
}

/// Position at the previous tic; only present on things that moved.
#[derive(Debug, Clone, Copy)]
pub struct PrevPosition(pub Vec2, pub f32);

/// Position to draw at, `lerp` of the way from the previous tic to this one.
#[inline]
pub fn render_position(pos: &Position, prev: Option<&PrevPosition>, lerp: f32) -> Vec3 {
    match prev {
        Some(p) => p.0.extend(p.1).lerp(pos.xyz(), lerp),
        None => pos.xyz(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Angle(pub f32);

#[derive(Debug, Clone, Copy)]
pub struct Subsector(pub SubsectorId);

/// Current sprite frame of a thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anim {
    pub sprite: SpriteId,
    /// Frame number, may carry [`FF_FULLBRIGHT`].
    pub frame: u16,
}

impl Anim {
    pub const NULL: Anim = Anim {
        sprite: NULL_SPRITE,
        frame: 0,
    };

    #[inline]
    pub fn new(sprite: SpriteId, frame: u16) -> Self {
        Self { sprite, frame }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.sprite == NULL_SPRITE
    }

    #[inline]
    pub fn fullbright(&self) -> bool {
        self.frame & FF_FULLBRIGHT != 0
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ActorFlags(pub MobjFlags);

/// One screen-space overlay sprite (weapon, muzzle flash) of a player.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerSprite {
    /// `None` while the slot shows nothing.
    pub anim: Option<Anim>,
    pub sx: f32,
    pub sy: f32,
    pub prev_sx: f32,
    pub prev_sy: f32,
}

impl PlayerSprite {
    /// Screen offset interpolated between the last two tics.
    #[inline]
    pub fn offset(&self, lerp: f32) -> Vec2 {
        Vec2::new(self.prev_sx, self.prev_sy).lerp(Vec2::new(self.sx, self.sy), lerp)
    }
}

pub const NUM_PSPRITES: usize = 2;

/// Weapon and flash overlay slots of a player.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerSprites(pub [PlayerSprite; NUM_PSPRITES]);
