//! Sprite fragments: things cut along BSP partitions so each piece can be
//! drawn together with the subsector it lies in.
//!
//! Per frame:
//! 1. [`SpriteFrags::build_frame`] makes one billboard per visible thing and
//!    pushes it down the BSP.  Where the billboard straddles a partition it
//!    is cut in two, unless the cut would let part of the sprite show
//!    through a wall; then it stays whole on the side its thing stands on.
//! 2. [`SpriteFrags::draw_subsector`] draws one subsector's pieces back to
//!    front, right after that subsector's opaque geometry.
//! 3. [`SpriteFrags::draw_weapon`] draws the player's weapon overlay.

mod draw;
mod frag;
mod init;
mod oracle;
mod split;
mod store;
mod weapon;

use glam::Vec2;
use hecs::Entity;
use log::{debug, warn};
use smallvec::SmallVec;

pub use frag::{SplitTestLine, SpriteFrag};
pub use weapon::WeaponView;

use crate::config::SpriteConfig;
use crate::defs::SpriteTable;
use crate::sim::{ActorFlags, Angle, Anim, Position, PrevPosition, Subsector, render_position};
use crate::world::{Camera, FrameVisibility, Level, TextureBank};

use self::{
    init::{ThingSprite, init_frag},
    split::Splitter,
    store::FragStore,
};

/// Everything the fragment builder reads during one frame.
pub struct SpriteScene<'a> {
    pub level: &'a Level,
    pub vis: &'a FrameVisibility,
    pub world: &'a hecs::World,
    pub sprites: &'a SpriteTable,
    pub camera: &'a Camera,
    /// Thing the view is attached to; it is never drawn.
    pub view_entity: Option<Entity>,
    /// Fraction of the current tic elapsed, for position interpolation.
    pub lerp: f32,
}

/// Counters of the last [`SpriteFrags::build_frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Things that produced a sprite.
    pub things: usize,
    /// Fragments filed under a drawn subsector.
    pub fragments: usize,
    pub splits: usize,
    /// Straddling fragments that could not be cut there.
    pub vetoed: usize,
    /// Straddling fragments not cut because the split depth limit was hit.
    pub capped: usize,
    /// Fragments that ended up in a subsector not drawn this frame.
    pub culled: usize,
}

/// Per-frame sprite fragment lists.  Owned by the frame driver and reused
/// across frames.
pub struct SpriteFrags {
    cfg: SpriteConfig,
    store: FragStore,
    /// (draw index, thing) pairs gathered for the current frame
    things: Vec<(u16, Entity)>,
    sort_scratch: SmallVec<[u32; 32]>,
    stats: FrameStats,
}

impl Default for SpriteFrags {
    fn default() -> Self {
        Self::new(SpriteConfig::default())
    }
}

impl SpriteFrags {
    pub fn new(cfg: SpriteConfig) -> Self {
        Self {
            store: FragStore::with_capacity(cfg.initial_frag_capacity),
            cfg,
            things: Vec::new(),
            sort_scratch: SmallVec::new(),
            stats: FrameStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &SpriteConfig {
        &self.cfg
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Total fragments filed this frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Fragments filed under draw subsector `draw_idx`, in list order.
    pub fn subsector_frags(&self, draw_idx: u16) -> impl Iterator<Item = &SpriteFrag> + '_ {
        self.store.leaf(draw_idx).map(|i| self.store.get(i))
    }

    /// Rebuild every subsector's fragment list for this frame.
    ///
    /// Must run after `scene.vis` is complete and before the first
    /// [`draw_subsector`](Self::draw_subsector).  Textures are made
    /// resident as a side effect; a thing whose image cannot be cached is
    /// skipped for this frame.
    pub fn build_frame(&mut self, scene: &SpriteScene, textures: &mut TextureBank) -> FrameStats {
        self.store.reset(scene.vis.len());
        self.stats = FrameStats::default();

        // Things in drawn subsectors, grouped in draw order.
        self.things.clear();
        for (e, ss) in scene.world.query::<&Subsector>().iter() {
            if Some(e) == scene.view_entity {
                continue;
            }
            if let Some(draw_idx) = scene.vis.draw_index(ss.0) {
                self.things.push((draw_idx, e));
            }
        }
        self.things.sort_by_key(|&(draw_idx, _)| draw_idx);

        let view_proj = scene.camera.view_proj();
        let root = scene.level.bsp_root();

        for i in 0..self.things.len() {
            let (draw_idx, e) = self.things[i];
            let Some(thing) = thing_sprite(scene, e) else {
                continue;
            };

            let ss = scene.vis.draw_subsectors()[draw_idx as usize];
            let sector = scene.level.subsectors[ss as usize].sector;
            let light = scene.level.sector_draw_color(sector, thing.pos.z);

            let frag = match init_frag(
                &self.cfg,
                scene.camera,
                &view_proj,
                scene.sprites,
                textures,
                &thing,
                light,
            ) {
                Ok(Some(frag)) => frag,
                Ok(None) => continue,
                Err(err) => {
                    warn!("skipping sprite of {e:?}: {err}");
                    continue;
                }
            };

            self.stats.things += 1;
            let anchor: Vec2 = thing.pos.truncate();
            Splitter {
                level: scene.level,
                vis: scene.vis,
                cfg: &self.cfg,
                store: &mut self.store,
                stats: &mut self.stats,
            }
            .add_frag(root, frag, anchor, 0);
        }

        let s = self.stats;
        debug!(
            "sprite frags: {} things, {} fragments, {} splits, {} vetoed, {} capped, {} culled",
            s.things, s.fragments, s.splits, s.vetoed, s.capped, s.culled
        );
        s
    }
}

/// Interpolated sprite state of `e`, or `None` if it has nothing to draw.
fn thing_sprite(scene: &SpriteScene, e: Entity) -> Option<ThingSprite> {
    let mut q = scene
        .world
        .query_one::<(&Position, Option<&PrevPosition>, &Angle, &Anim, Option<&ActorFlags>)>(e)
        .ok()?;
    let (pos, prev, angle, anim, flags) = q.get()?;
    if anim.is_null() {
        return None;
    }
    Some(ThingSprite {
        pos: render_position(pos, prev, scene.lerp),
        angle: angle.0,
        anim: *anim,
        flags: flags.map(|f| f.0).unwrap_or_default(),
    })
}
