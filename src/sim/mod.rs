mod components;
mod mob;

pub use components::{
    ActorFlags, Angle, Anim, NUM_PSPRITES, PlayerSprite, PlayerSprites, Position, PrevPosition,
    Subsector, render_position,
};
pub use mob::spawn_thing;
