//! Tunables of the sprite renderer.

/// Sprite renderer settings.  `Default` gives the PlayStation values.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteConfig {
    /// Horizontal stretch of sprite images; the original art assumes
    /// non-square pixels.
    pub aspect: f32,
    /// Half-length of the split test line, as a fraction of the split
    /// parameter.
    pub split_test_bias: f32,
    /// Splits deeper than this are refused.
    pub max_split_depth: u32,
    /// Fragments reserved up front.
    pub initial_frag_capacity: usize,
    /// Width of the UI coordinate space.
    pub screen_w: i32,
    /// Height of the 3D view in UI coordinates.
    pub view_h: i32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            aspect: 4.0 / 5.0,
            split_test_bias: 0.01,
            max_split_depth: 64,
            initial_frag_capacity: 8192,
            screen_w: 256,
            view_h: 200,
        }
    }
}
