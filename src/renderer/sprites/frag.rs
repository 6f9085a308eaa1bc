use glam::Vec2;

use crate::renderer::{DrawPipeline, SemiTransparency};
use crate::world::{Rgb, TexWindow};

/// One planar piece of a camera-facing sprite quad.
///
/// `p1`/`p2` are the bottom edge endpoints on the map plane, `yt`/`yb` the
/// top and bottom heights.  Pieces of the same sprite share `depth`, which
/// is the depth of the thing's anchor point and not of the piece itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteFrag {
    /// Next fragment filed under the same subsector.
    pub next: Option<u32>,
    pub depth: f32,
    pub p1: Vec2,
    pub p2: Vec2,
    pub yt: f32,
    pub yb: f32,
    pub ul: f32,
    pub ur: f32,
    pub vt: f32,
    pub vb: f32,
    pub window: TexWindow,
    pub color: Rgb,
    pub st_mul: SemiTransparency,
    pub pipeline: DrawPipeline,
}

/// Short line used to ask whether a sprite may be cut at some point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitTestLine {
    pub p1: Vec2,
    pub p2: Vec2,
    /// Height at which walls are tested.
    pub y: f32,
}

impl SpriteFrag {
    #[inline]
    pub fn mid_height(&self) -> f32 {
        (self.yt + self.yb) * 0.5
    }

    /// Short test line straddling the point `t` of the way from `p1` to `p2`.
    pub fn test_line(&self, t: f32, bias: f32) -> SplitTestLine {
        let t1 = (t * (1.0 - bias)).clamp(0.0, 1.0);
        let t2 = (t * (1.0 + bias)).clamp(0.0, 1.0);
        SplitTestLine {
            p1: self.p1.lerp(self.p2, t1),
            p2: self.p1.lerp(self.p2, t2),
            y: self.mid_height(),
        }
    }

    /// Cut at `t`; the first piece keeps `p1`, the second keeps `p2`.
    ///
    /// Both pieces get the very same boundary point and U coordinate.
    pub fn split_at(&self, t: f32) -> (SpriteFrag, SpriteFrag) {
        let p = self.p1.lerp(self.p2, t);
        let u = self.ul + (self.ur - self.ul) * t;
        let a = SpriteFrag {
            p2: p,
            ur: u,
            ..*self
        };
        let b = SpriteFrag {
            p1: p,
            ul: u,
            ..*self
        };
        (a, b)
    }
}

#[cfg(test)]
pub(crate) fn test_frag(p1: Vec2, p2: Vec2) -> SpriteFrag {
    SpriteFrag {
        next: None,
        depth: 100.0,
        p1,
        p2,
        yt: 56.0,
        yb: 0.0,
        ul: 0.0,
        ur: 40.0,
        vt: 0.0,
        vb: 56.0,
        window: TexWindow::default(),
        color: Rgb::FULLBRIGHT,
        st_mul: SemiTransparency::FULL,
        pipeline: DrawPipeline::SpriteMasked,
    }
}
