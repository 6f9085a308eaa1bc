// Sprite texture repository plus a tiny model of the texture atlas the GPU
// samples from.  The renderer interacts through `TextureId` only; `cache`
// is the one call that has to happen before an image may be drawn.

use std::collections::HashMap;

use log::debug;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` of the fallback image.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Default atlas size, matching the 1024×512 texel PlayStation VRAM.
pub const ATLAS_W: u16 = 1024;
pub const ATLAS_H: u16 = 512;

/// Where a resident image lives inside the atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TexWindow {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

/// Sprite image header: size and Doom patch offsets.  Pixel data lives
/// with the GPU upload path, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: u16,
    pub h: u16,
    /// Pixels from the image's left edge to its origin (patch `leftoffset`).
    pub offset_x: i16,
    /// Pixels from the image's top edge to its origin (patch `topoffset`).
    pub offset_y: i16,
    /// `Some` while the image is resident in the atlas.
    window: Option<TexWindow>,
}

impl Texture {
    pub fn new(name: impl Into<String>, w: u16, h: u16, offset_x: i16, offset_y: i16) -> Self {
        Self {
            name: name.into(),
            w,
            h,
            offset_x,
            offset_y,
            window: None,
        }
    }

    #[inline]
    pub fn window(&self) -> Option<TexWindow> {
        self.window
    }
}

/// 8×8 checkerboard stand-in for missing images.
impl Default for Texture {
    fn default() -> Self {
        Texture::new("CHECKER", 8, 8, 4, 8)
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// The image can never fit, even in an empty atlas.
    #[error("texture id {id} is {w}x{h}, larger than the atlas")]
    TooLarge { id: TextureId, w: u16, h: u16 },

    /// No room left this frame; the atlas is flushed at the next frame start.
    #[error("atlas full while caching texture id {0}")]
    AtlasFull(TextureId),
}

/*──────────────────────────── atlas ────────────────────────────*/

/// Shelf allocator: fills rows left to right, opening a new shelf under
/// the tallest image of the current one when a row runs out.
#[derive(Debug)]
struct Atlas {
    w: u16,
    h: u16,
    cursor_x: u16,
    shelf_y: u16,
    shelf_h: u16,
}

impl Atlas {
    fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cursor_x: 0,
            shelf_y: 0,
            shelf_h: 0,
        }
    }

    fn alloc(&mut self, w: u16, h: u16) -> Option<TexWindow> {
        if w > self.w || h > self.h {
            return None;
        }
        if self.cursor_x as u32 + w as u32 > self.w as u32 {
            // next shelf
            self.shelf_y = self.shelf_y.checked_add(self.shelf_h)?;
            self.cursor_x = 0;
            self.shelf_h = 0;
        }
        if self.shelf_y as u32 + h as u32 > self.h as u32 {
            return None;
        }
        let win = TexWindow {
            x: self.cursor_x,
            y: self.shelf_y,
            w,
            h,
        };
        self.cursor_x += w;
        self.shelf_h = self.shelf_h.max(h);
        Some(win)
    }

    fn clear(&mut self) {
        self.cursor_x = 0;
        self.shelf_y = 0;
        self.shelf_h = 0;
    }
}

/// A palette-agnostic, format-agnostic cache of sprite textures.
///
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
///
/// **Thread-safety:** access `TextureBank` from a single thread; the
/// struct itself is not `Sync`.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
    atlas: Atlas,
    flush_pending: bool,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        Self::with_atlas(missing_tex, ATLAS_W, ATLAS_H)
    }

    pub fn with_atlas(missing_tex: Texture, atlas_w: u16, atlas_h: u16) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
            atlas: Atlas::new(atlas_w, atlas_h),
            flush_pending: false,
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    pub fn resident_count(&self) -> usize {
        self.data.iter().filter(|t| t.window.is_some()).count()
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(&mut self, name: S, tex: Texture) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(Texture { window: None, ..tex });
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Make `id` resident and return it with its atlas window filled in.
    pub fn cache(&mut self, id: TextureId) -> Result<&Texture, TextureError> {
        let tex = self.data.get(id as usize).ok_or(TextureError::BadId(id))?;
        if tex.window.is_none() {
            let (w, h) = (tex.w, tex.h);
            if w > self.atlas.w || h > self.atlas.h {
                return Err(TextureError::TooLarge { id, w, h });
            }
            match self.atlas.alloc(w, h) {
                Some(win) => self.data[id as usize].window = Some(win),
                None => {
                    self.flush_pending = true;
                    return Err(TextureError::AtlasFull(id));
                }
            }
        }
        Ok(&self.data[id as usize])
    }

    /// Frame-start housekeeping: if the atlas overflowed last frame, evict
    /// everything so this frame starts from an empty atlas.
    ///
    /// Eviction never happens mid-frame, so windows already handed out stay
    /// valid until the frame is drawn.
    pub fn begin_frame(&mut self) {
        if !self.flush_pending {
            return;
        }
        debug!("texture atlas overflowed; evicting {} images", self.resident_count());
        for tex in &mut self.data {
            tex.window = None;
        }
        self.atlas.clear();
        self.flush_pending = false;
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(w: u16, h: u16) -> Texture {
        Texture::new("Dummy", w, h, 0, 0)
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(2, 2)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(4, 4)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("NOPE"), None);
        assert_eq!(bank.id_or_missing("NOPE"), NO_TEXTURE);
        assert_eq!(bank.texture(blue).unwrap().w, 4);
    }

    #[test]
    fn textures_are_headers_only() {
        let tex = Texture::new("TROOA1", 41, 57, 20, 57);
        assert_eq!(
            tex,
            Texture {
                name: "TROOA1".into(),
                w: 41,
                h: 57,
                offset_x: 20,
                offset_y: 57,
                window: None,
            }
        );
        let mut bank = TextureBank::default_with_checker();
        let fallback = bank.cache(NO_TEXTURE).unwrap();
        assert_eq!((fallback.w, fallback.h), (8, 8));
        assert!(fallback.window().is_some());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1, 1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2, 2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let mut bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.cache(bad).unwrap_err(), TextureError::BadId(bad));
    }

    #[test]
    fn cache_assigns_stable_disjoint_windows() {
        let mut bank = TextureBank::default_with_checker();
        let a = bank.insert("A", dummy_tex(40, 60)).unwrap();
        let b = bank.insert("B", dummy_tex(30, 20)).unwrap();

        let wa = bank.cache(a).unwrap().window().unwrap();
        let wb = bank.cache(b).unwrap().window().unwrap();
        assert_eq!((wa.w, wa.h), (40, 60));
        assert_eq!((wb.x, wb.y), (40, 0));
        // second request is a no-op
        assert_eq!(bank.cache(a).unwrap().window(), Some(wa));
        assert_eq!(bank.resident_count(), 2);
    }

    #[test]
    fn shelf_wraps_to_next_row() {
        let mut bank = TextureBank::with_atlas(Texture::default(), 64, 64);
        let a = bank.insert("A", dummy_tex(40, 10)).unwrap();
        let b = bank.insert("B", dummy_tex(40, 20)).unwrap();
        bank.cache(a).unwrap();
        let wb = bank.cache(b).unwrap().window().unwrap();
        assert_eq!((wb.x, wb.y), (0, 10));
    }

    #[test]
    fn overflow_flushes_on_next_frame() {
        let mut bank = TextureBank::with_atlas(Texture::default(), 32, 32);
        let a = bank.insert("A", dummy_tex(32, 32)).unwrap();
        let b = bank.insert("B", dummy_tex(8, 8)).unwrap();
        let huge = bank.insert("HUGE", dummy_tex(64, 8)).unwrap();

        bank.cache(a).unwrap();
        assert_eq!(bank.cache(b).unwrap_err(), TextureError::AtlasFull(b));
        assert!(matches!(bank.cache(huge), Err(TextureError::TooLarge { .. })));

        // window of `a` survives until the frame boundary
        assert!(bank.texture(a).unwrap().window().is_some());
        bank.begin_frame();
        assert_eq!(bank.resident_count(), 0);
        assert!(bank.cache(b).is_ok());
    }
}
