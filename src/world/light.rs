//! Sector lighting as seen by the sprite renderer.
//!
//! Colours come in two scales:
//! * *light colours* are plain 0‥255 RGB as authored on the sector;
//! * *draw colours* are what the shader multiplies texels with, where
//!   [`LIGHT_INTENSITY_MAX`] (128) means "texel unchanged".

use crate::world::geometry::{Level, Sector, SectorId};

/// Draw-colour value that leaves a texel at full brightness.
pub const LIGHT_INTENSITY_MAX: u8 = 128;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::splat(255);
    pub const FULLBRIGHT: Rgb = Rgb::splat(LIGHT_INTENSITY_MAX);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn splat(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Per-channel `c * num / den`, computed in u32.
    #[inline]
    pub fn scale(self, num: u32, den: u32) -> Rgb {
        let f = |c: u8| ((c as u32 * num) / den).min(255) as u8;
        Rgb::new(f(self.r), f(self.g), f(self.b))
    }

    #[inline]
    fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let f = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }
}

impl Sector {
    /// Authored light colour at height `z`.
    ///
    /// The floor colour applies at or below the floor, the ceiling colour at
    /// or above the ceiling, with a linear blend in between.
    pub fn light_color(&self, z: f32) -> Rgb {
        if self.floor_color == self.ceil_color {
            return self.floor_color;
        }
        let span = self.ceil_draw_h - self.floor_draw_h;
        if span <= 0.0 {
            return self.floor_color;
        }
        let t = ((z - self.floor_draw_h) / span).clamp(0.0, 1.0);
        self.floor_color.lerp(self.ceil_color, t)
    }

    /// Shading colour for something at height `z` in this sector.
    pub fn draw_color(&self, z: f32) -> Rgb {
        let lit = self.light_color(z).scale(self.light_level as u32, 255);
        lit.scale(LIGHT_INTENSITY_MAX as u32, 255)
    }
}

impl Level {
    #[inline]
    pub fn sector_draw_color(&self, sector: SectorId, z: f32) -> Rgb {
        self.sectors[sector as usize].draw_color(z)
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_light_white_sector_is_max_intensity() {
        let sec = Sector::new(0.0, 128.0, 255);
        assert_eq!(sec.draw_color(32.0), Rgb::FULLBRIGHT);
    }

    #[test]
    fn light_level_darkens() {
        let sec = Sector::new(0.0, 128.0, 128);
        let c = sec.draw_color(0.0);
        assert_eq!(c, Rgb::splat(64));
    }

    #[test]
    fn dual_colour_blends_with_height() {
        let sec = Sector::new(0.0, 100.0, 255)
            .with_colors(Rgb::new(255, 0, 0), Rgb::new(0, 0, 255));
        assert_eq!(sec.light_color(-10.0), Rgb::new(255, 0, 0));
        assert_eq!(sec.light_color(500.0), Rgb::new(0, 0, 255));
        let mid = sec.light_color(50.0);
        assert_eq!(mid.g, 0);
        assert!(mid.r > 120 && mid.r < 135);
        assert!(mid.b > 120 && mid.b < 135);
    }
}
