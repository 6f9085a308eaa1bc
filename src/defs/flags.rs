use bitflags::bitflags;

bitflags! {
    /// Behaviour / rendering flags carried by every **mobj** at runtime.
    ///
    /// Low bits follow `doom/info.h`; the top three bits are the
    /// PlayStation blend-mode controls.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MobjFlags: u32 {
        // Blocks movement.
        const SOLID          = 0x0000_0002;

        // Flying projectile.
        const MISSILE        = 0x0001_0000;

        // Rendering: semi-transparent.  Without a mode bit this is a 50%
        // alpha blend.
        const BLEND_ON        = 0x1000_0000;
        // Additive blend (25% strength when combined with BIT2).
        const BLEND_MODE_BIT1 = 0x2000_0000;
        // Subtractive blend (when BIT1 is clear).
        const BLEND_MODE_BIT2 = 0x4000_0000;

        const ALL_BLEND_FLAGS = Self::BLEND_ON.bits()
            | Self::BLEND_MODE_BIT1.bits()
            | Self::BLEND_MODE_BIT2.bits();
    }
}

/// Frame number bit: draw at full brightness regardless of sector light.
pub const FF_FULLBRIGHT: u16 = 0x8000;

/// Mask extracting the frame index from a frame number.
pub const FF_FRAMEMASK: u16 = 0x7FFF;
