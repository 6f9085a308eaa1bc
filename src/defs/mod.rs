pub mod flags;
pub mod sprites;

pub use self::{
    flags::{FF_FRAMEMASK, FF_FULLBRIGHT, MobjFlags},
    sprites::{NULL_SPRITE, SpriteDef, SpriteFrame, SpriteId, SpriteTable, rotation_index},
};
