//! Builds the full-size fragment for one thing.

use glam::{Mat4, Vec2, Vec3};

use super::SpriteFrag;
use crate::config::SpriteConfig;
use crate::defs::{MobjFlags, SpriteTable};
use crate::renderer::{DrawPipeline, SemiTransparency};
use crate::sim::Anim;
use crate::world::{
    Camera, Rgb, TextureBank, TextureError,
    camera::{clip_depth, to_render},
};

/// What the fragment builder needs to know about a thing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ThingSprite {
    /// Interpolated map position, z = bottom of the thing.
    pub pos: Vec3,
    pub angle: f32,
    pub anim: Anim,
    pub flags: MobjFlags,
}

/// Pipeline and blend strength for a thing's flags.  The first matching
/// rule wins.
pub(crate) fn blend_mode(flags: MobjFlags) -> (DrawPipeline, SemiTransparency) {
    if flags.contains(MobjFlags::BLEND_MODE_BIT1) {
        let rgb = if flags.contains(MobjFlags::BLEND_MODE_BIT2) { 32 } else { 128 };
        (
            DrawPipeline::SpriteAdditive,
            SemiTransparency::new(rgb, rgb, rgb, 128),
        )
    } else if flags.contains(MobjFlags::BLEND_MODE_BIT2) {
        (DrawPipeline::SpriteSubtractive, SemiTransparency::FULL)
    } else if flags.contains(MobjFlags::BLEND_ON) {
        (
            DrawPipeline::SpriteAlpha,
            SemiTransparency::new(128, 128, 128, 64),
        )
    } else {
        (DrawPipeline::SpriteMasked, SemiTransparency::FULL)
    }
}

/// Camera-facing quad covering the whole sprite image of `thing`.
///
/// Returns `Ok(None)` when the thing's frame has no image.  `light` is the
/// sector draw colour at the thing's height.
pub(crate) fn init_frag(
    cfg: &SpriteConfig,
    camera: &Camera,
    view_proj: &Mat4,
    sprites: &SpriteTable,
    textures: &mut TextureBank,
    thing: &ThingSprite,
    light: Rgb,
) -> Result<Option<SpriteFrag>, TextureError> {
    let Some(frame) = sprites.frame(thing.anim.sprite, thing.anim.frame) else {
        return Ok(None);
    };

    let to_thing = thing.pos.truncate() - camera.pos().truncate();
    let view_angle = to_thing.y.atan2(to_thing.x);
    let (tex_id, flipped) = frame.variant(view_angle, thing.angle);

    let tex = textures.cache(tex_id)?;
    let Some(window) = tex.window() else {
        return Err(TextureError::BadId(tex_id));
    };

    let (w, h) = (tex.w as f32, tex.h as f32);
    let width = w * cfg.aspect;
    let offset_x = if flipped {
        (-w + tex.offset_x as f32) * cfg.aspect
    } else {
        -(tex.offset_x as f32) * cfg.aspect
    };
    let offset_y = -h + tex.offset_y as f32;

    let right = camera.billboard_right();
    let anchor = thing.pos.truncate();
    let p1: Vec2 = anchor + right * offset_x;
    let p2 = p1 + right * width;
    let yb = thing.pos.z + offset_y;

    let (mut ul, mut ur) = (0.0, w);
    if flipped {
        std::mem::swap(&mut ul, &mut ur);
    }

    let (pipeline, st_mul) = blend_mode(thing.flags);
    let color = if thing.anim.fullbright() { Rgb::FULLBRIGHT } else { light };

    Ok(Some(SpriteFrag {
        next: None,
        depth: clip_depth(view_proj, to_render(thing.pos)),
        p1,
        p2,
        yt: yb + h,
        yb,
        ul,
        ur,
        vt: 0.0,
        vb: h,
        window,
        color,
        st_mul,
        pipeline,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{FF_FULLBRIGHT, SpriteDef, SpriteFrame};
    use crate::world::Texture;
    use std::f32::consts::{FRAC_PI_2, PI};

    struct Fixture {
        cfg: SpriteConfig,
        camera: Camera,
        sprites: SpriteTable,
        textures: TextureBank,
    }

    /// Viewer at the origin looking east; one 40×56 sprite with its origin
    /// at the bottom centre.
    fn fixture(flip: bool) -> Fixture {
        let mut textures = TextureBank::default_with_checker();
        let tex = textures
            .insert("TROOA1", Texture::new("TROOA1", 40, 56, 20, 56))
            .unwrap();
        let mut sprites = SpriteTable::default();
        sprites.push(SpriteDef {
            frames: vec![SpriteFrame::single(tex, flip)],
        });
        Fixture {
            cfg: SpriteConfig::default(),
            camera: Camera::new(Vec3::new(0.0, 0.0, 41.0), 0.0, FRAC_PI_2),
            sprites,
            textures,
        }
    }

    fn thing(frame: u16, flags: MobjFlags) -> ThingSprite {
        ThingSprite {
            pos: Vec3::new(200.0, 0.0, 8.0),
            angle: PI,
            anim: Anim::new(0, frame),
            flags,
        }
    }

    fn build(f: &mut Fixture, t: &ThingSprite) -> SpriteFrag {
        let vp = f.camera.view_proj();
        init_frag(&f.cfg, &f.camera, &vp, &f.sprites, &mut f.textures, t, Rgb::splat(64))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn billboard_is_centred_on_the_anchor() {
        let mut f = fixture(false);
        let frag = build(&mut f, &thing(0, MobjFlags::empty()));
        // facing east the billboard runs north to south
        assert_eq!(frag.p1, Vec2::new(200.0, 16.0));
        assert_eq!(frag.p2, Vec2::new(200.0, -16.0));
        assert_eq!((frag.yb, frag.yt), (8.0, 64.0));
        assert_eq!((frag.ul, frag.ur, frag.vt, frag.vb), (0.0, 40.0, 0.0, 56.0));
        assert_eq!(frag.color, Rgb::splat(64));
        assert_eq!(frag.pipeline, DrawPipeline::SpriteMasked);
        assert_eq!(frag.next, None);
    }

    #[test]
    fn depth_is_the_transformed_anchor() {
        let mut f = fixture(false);
        let t = thing(0, MobjFlags::empty());
        let frag = build(&mut f, &t);
        let vp = f.camera.view_proj();
        assert_eq!(frag.depth, clip_depth(&vp, to_render(t.pos)));
    }

    #[test]
    fn flipped_sprite_swaps_u_and_mirrors_offset() {
        let mut f = fixture(true);
        let frag = build(&mut f, &thing(0, MobjFlags::empty()));
        assert_eq!((frag.ul, frag.ur), (40.0, 0.0));
        // symmetric origin: same extent as unflipped
        assert_eq!(frag.p1, Vec2::new(200.0, 16.0));
        assert_eq!(frag.p2, Vec2::new(200.0, -16.0));
    }

    #[test]
    fn fullbright_frame_ignores_sector_light() {
        let mut f = fixture(false);
        let frag = build(&mut f, &thing(FF_FULLBRIGHT, MobjFlags::empty()));
        assert_eq!(frag.color, Rgb::new(128, 128, 128));
    }

    #[test]
    fn blend_flags_are_prioritised() {
        use MobjFlags as F;
        assert_eq!(blend_mode(F::empty()), (DrawPipeline::SpriteMasked, SemiTransparency::FULL));
        assert_eq!(
            blend_mode(F::BLEND_ON),
            (DrawPipeline::SpriteAlpha, SemiTransparency::new(128, 128, 128, 64))
        );
        assert_eq!(
            blend_mode(F::BLEND_ON | F::BLEND_MODE_BIT2),
            (DrawPipeline::SpriteSubtractive, SemiTransparency::FULL)
        );
        assert_eq!(
            blend_mode(F::BLEND_ON | F::BLEND_MODE_BIT1),
            (DrawPipeline::SpriteAdditive, SemiTransparency::FULL)
        );
        assert_eq!(
            blend_mode(F::ALL_BLEND_FLAGS),
            (DrawPipeline::SpriteAdditive, SemiTransparency::new(32, 32, 32, 128))
        );
    }

    #[test]
    fn missing_frame_yields_nothing() {
        let mut f = fixture(false);
        let vp = f.camera.view_proj();
        let t = thing(3, MobjFlags::empty());
        let res = init_frag(&f.cfg, &f.camera, &vp, &f.sprites, &mut f.textures, &t, Rgb::WHITE);
        assert_eq!(res, Ok(None));
    }

    #[test]
    fn texture_larger_than_atlas_is_an_error() {
        let mut f = fixture(false);
        f.textures = TextureBank::with_atlas(Texture::default(), 32, 32);
        let big = f.textures.insert("BIG", Texture::new("BIG", 64, 64, 0, 0)).unwrap();
        f.sprites = SpriteTable::default();
        f.sprites.push(SpriteDef {
            frames: vec![SpriteFrame::single(big, false)],
        });
        let vp = f.camera.view_proj();
        let res = init_frag(&f.cfg, &f.camera, &vp, &f.sprites, &mut f.textures, &thing(0, MobjFlags::empty()), Rgb::WHITE);
        assert_eq!(res, Err(TextureError::TooLarge { id: big, w: 64, h: 64 }));
    }
}
