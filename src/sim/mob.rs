use super::{ActorFlags, Angle, Anim, Position, Subsector};
use crate::defs::MobjFlags;
use crate::world::Level;
use glam::Vec2;
use hecs::World;

/// Spawn a thing standing on the floor of whatever subsector contains
/// `(x, y)`.
pub fn spawn_thing(
    world: &mut World,
    level: &Level,
    x: f32,
    y: f32,
    angle: f32,
    anim: Anim,
    flags: MobjFlags,
) -> hecs::Entity {
    let pos = Vec2::new(x, y);
    let ss = level.locate_subsector(pos);
    let z = level.sector_of_subsector(ss).floor_h;
    world.spawn((
        Position(pos, z),
        Angle(angle),
        Subsector(ss),
        anim,
        ActorFlags(flags),
    ))
}
