//! Player weapon overlay.  Drawn in screen space on top of the 3D view;
//! it never goes through the BSP.

use hecs::{Entity, World};
use log::warn;

use super::SpriteFrags;
use crate::defs::{MobjFlags, SpriteTable};
use crate::renderer::{DrawPipeline, DrawSink, UiSprite};
use crate::sim::{ActorFlags, PlayerSprites, Position, PrevPosition, Subsector, render_position};
use crate::world::{Level, SectorId, TextureBank};

/// The view player's overlay state for one frame.
#[derive(Clone, Copy, Debug)]
pub struct WeaponView {
    pub psprites: PlayerSprites,
    /// Sector the player stands in, for lighting.
    pub sector: SectorId,
    /// Player height, for lighting.
    pub z: f32,
    pub flags: MobjFlags,
    pub lerp: f32,
}

impl WeaponView {
    /// Read the overlay state off a player entity.  `None` if the entity
    /// has no player sprites.
    pub fn of_player(world: &World, player: Entity, level: &Level, lerp: f32) -> Option<Self> {
        let mut q = world
            .query_one::<(
                &PlayerSprites,
                &Position,
                Option<&PrevPosition>,
                &Subsector,
                Option<&ActorFlags>,
            )>(player)
            .ok()?;
        let (psprites, pos, prev, ss, flags) = q.get()?;
        Some(Self {
            psprites: *psprites,
            sector: level.subsectors[ss.0 as usize].sector,
            z: render_position(pos, prev, lerp).z,
            flags: flags.map(|f| f.0).unwrap_or_default(),
            lerp,
        })
    }
}

impl SpriteFrags {
    /// Draw every active overlay slot of `view`.
    pub fn draw_weapon(
        &self,
        view: &WeaponView,
        level: &Level,
        sprites: &SpriteTable,
        textures: &mut TextureBank,
        sink: &mut impl DrawSink,
    ) {
        let sector = &level.sectors[view.sector as usize];
        let pipeline = if view.flags.intersects(MobjFlags::ALL_BLEND_FLAGS) {
            DrawPipeline::UiAdditive
        } else {
            DrawPipeline::Ui
        };

        for psp in &view.psprites.0 {
            let Some(anim) = psp.anim.filter(|a| !a.is_null()) else {
                continue;
            };
            let Some(frame) = sprites.frame(anim.sprite, anim.frame) else {
                continue;
            };
            let tex = match textures.cache(frame.lump[0]) {
                Ok(tex) => tex,
                Err(err) => {
                    warn!("skipping weapon sprite: {err}");
                    continue;
                }
            };
            let Some(window) = tex.window() else {
                continue;
            };

            let color = if anim.fullbright() {
                sector.light_color(view.z).scale(5, 8)
            } else {
                sector.draw_color(view.z)
            };

            let off = psp.offset(view.lerp);
            sink.set_pipeline(pipeline);
            sink.add_ui_sprite(&UiSprite {
                x: (off.x + (self.cfg.screen_w / 2) as f32 - tex.offset_x as f32).floor() as i32,
                y: (off.y + (self.cfg.view_h - 1) as f32 - tex.offset_y as f32).floor() as i32,
                w: tex.w,
                h: tex.h,
                u: 0,
                v: 0,
                window,
                color,
                alpha: 128,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{FF_FULLBRIGHT, SpriteDef, SpriteFrame};
    use crate::renderer::DrawList;
    use crate::sim::{Anim, PlayerSprite, spawn_thing};
    use crate::world::{Rgb, Texture};
    use crate::world::test_map::{self, Divider};

    struct Rig {
        level: Level,
        world: World,
        sprites: SpriteTable,
        textures: TextureBank,
        player: Entity,
    }

    fn rig(frame: u16, flags: MobjFlags) -> Rig {
        let mut level = test_map::two_rooms(Divider::Open);
        level.sectors[0].light_level = 128;
        let mut textures = TextureBank::default_with_checker();
        let tex = textures
            .insert("PISGA0", Texture::new("PISGA0", 60, 40, -30, -90))
            .unwrap();
        let mut sprites = SpriteTable::default();
        sprites.push(SpriteDef {
            frames: vec![SpriteFrame::single(tex, false)],
        });

        let mut world = World::new();
        let player = spawn_thing(&mut world, &level, 40.0, 64.0, 0.0, Anim::new(0, 0), flags);
        let mut psp = PlayerSprites::default();
        psp.0[0] = PlayerSprite {
            anim: Some(Anim::new(0, frame)),
            sx: 4.0,
            sy: 10.0,
            prev_sx: 0.0,
            prev_sy: 0.0,
        };
        world.insert_one(player, psp).unwrap();

        Rig {
            level,
            world,
            sprites,
            textures,
            player,
        }
    }

    fn draw(r: &mut Rig, lerp: f32) -> DrawList {
        let view = WeaponView::of_player(&r.world, r.player, &r.level, lerp).unwrap();
        let mut list = DrawList::default();
        SpriteFrags::default().draw_weapon(&view, &r.level, &r.sprites, &mut r.textures, &mut list);
        list
    }

    #[test]
    fn weapon_is_placed_from_screen_centre() {
        let mut r = rig(0, MobjFlags::empty());
        let list = draw(&mut r, 1.0);
        let sprites: Vec<_> = list.ui_sprites().collect();
        assert_eq!(sprites.len(), 1);
        let (pipe, s) = sprites[0];
        assert_eq!(pipe, DrawPipeline::Ui);
        // 4 + 128 - (-30), 10 + 200 - 1 - (-90)
        assert_eq!((s.x, s.y), (162, 299));
        assert_eq!((s.w, s.h, s.u, s.v, s.alpha), (60, 40, 0, 0, 128));
        assert_eq!(s.color, Rgb::splat(64));
    }

    #[test]
    fn offsets_are_interpolated() {
        let mut r = rig(0, MobjFlags::empty());
        let list = draw(&mut r, 0.5);
        let (_, s) = list.ui_sprites().next().unwrap();
        assert_eq!((s.x, s.y), (160, 294));
    }

    #[test]
    fn sub_pixel_sway_is_not_snapped_towards_zero() {
        let mut r = rig(0, MobjFlags::empty());
        let mut xs = Vec::new();
        for sway in [-0.5, 0.5] {
            let mut psp = *r.world.get::<&PlayerSprites>(r.player).unwrap();
            psp.0[0].sx = sway;
            psp.0[0].prev_sx = sway;
            r.world.insert_one(r.player, psp).unwrap();
            let list = draw(&mut r, 1.0);
            xs.push(list.ui_sprites().next().unwrap().1.x);
        }
        // 128 + 30 ± 0.5
        assert_eq!(xs, [157, 158]);
    }

    #[test]
    fn fullbright_weapon_uses_five_eighths_of_light_colour() {
        let mut r = rig(FF_FULLBRIGHT, MobjFlags::empty());
        let list = draw(&mut r, 1.0);
        let (_, s) = list.ui_sprites().next().unwrap();
        assert_eq!(s.color, Rgb::splat(159));
    }

    #[test]
    fn blended_player_uses_additive_ui_pipeline() {
        let mut r = rig(0, MobjFlags::BLEND_ON);
        let list = draw(&mut r, 1.0);
        assert_eq!(list.ui_sprites().next().unwrap().0, DrawPipeline::UiAdditive);
    }

    #[test]
    fn empty_slots_draw_nothing() {
        let mut r = rig(0, MobjFlags::empty());
        let mut psp = *r.world.get::<&PlayerSprites>(r.player).unwrap();
        psp.0[0].anim = None;
        r.world.insert_one(r.player, psp).unwrap();
        assert!(draw(&mut r, 1.0).calls.is_empty());
    }
}
