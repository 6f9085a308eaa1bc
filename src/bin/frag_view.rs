//! Sprite fragment debug viewer.
//!
//! ```bash
//! cargo run --release --bin frag_view              # top-down window
//! cargo run --release --bin frag_view -- --headless --frames 8
//! ```
//!
//! Controls W/S = forward/back A/D = strafe ←/→ = turn Esc = quit
//!
//! Segs are grey, partitions dark blue, and every sprite fragment is drawn
//! in the colour of the subsector it was filed under.

use std::f32::consts::{FRAC_PI_2, PI};
use std::io::Write;

use anyhow::Context;
use clap::Parser;
use glam::{Vec2, Vec3, vec2};
use log::info;
use minifb::{Key, Window, WindowOptions};

use bsp_sprites::{
    SpriteConfig,
    defs::{FF_FULLBRIGHT, MobjFlags, SpriteDef, SpriteFrame, SpriteTable},
    renderer::{
        DrawList,
        sprites::{FrameStats, SpriteFrags, SpriteScene, WeaponView},
    },
    sim::{Anim, PlayerSprite, PlayerSprites, spawn_thing},
    world::{
        Camera, FrameVisibility, Level, LevelBuilder, LinedefFlags, NodeRef, Sector, SectorId,
        Texture, TextureBank,
    },
};

const WIDTH: usize = 1024;
const HEIGHT: usize = 768;
const ROOM: f32 = 256.0;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Print per-frame statistics instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 16)]
    frames: u32,

    /// Deepest allowed split per sprite
    #[arg(long, default_value_t = SpriteConfig::default().max_split_depth)]
    max_split_depth: u32,

    /// Horizontal sprite stretch
    #[arg(long, default_value_t = SpriteConfig::default().aspect)]
    aspect: f32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value_t = log::LevelFilter::Info)]
    verbose: log::LevelFilter,
}

/*───────────────────────── demo content ─────────────────────────*/

fn line(
    b: &mut LevelBuilder,
    p1: Vec2,
    p2: Vec2,
    flags: LinedefFlags,
    front: SectorId,
    back: Option<SectorId>,
) -> u16 {
    let v1 = b.vertex(p1.x, p1.y);
    let v2 = b.vertex(p2.x, p2.y);
    b.linedef(v1, v2, flags, front, back)
}

/// Four rooms along +x: open doorway, a 24 unit step, a masked grate.
/// The far end is closed by a solid wall.
fn demo_level() -> anyhow::Result<Level> {
    let mut b = LevelBuilder::new("DEMO");
    let floors = [0.0, 0.0, 24.0, 24.0];
    let lights = [255, 192, 160, 255];
    let sectors: Vec<SectorId> = floors
        .iter()
        .zip(lights)
        .map(|(&f, l)| b.sector(Sector::new(f, 160.0, l)))
        .collect();

    let none = LinedefFlags::empty();
    let mut sides: Vec<Vec<(u16, u16)>> = vec![Vec::new(); sectors.len()];

    let last = sectors.len() - 1;
    for (i, &s) in sectors.iter().enumerate() {
        let (x0, x1) = (ROOM * i as f32, ROOM * (i + 1) as f32);
        sides[i].push((line(&mut b, vec2(x0, ROOM), vec2(x1, ROOM), none, s, None), 0));
        sides[i].push((line(&mut b, vec2(x1, 0.0), vec2(x0, 0.0), none, s, None), 0));
        if i == 0 {
            sides[i].push((line(&mut b, vec2(x0, 0.0), vec2(x0, ROOM), none, s, None), 0));
        }
        if i == last {
            sides[i].push((line(&mut b, vec2(x1, ROOM), vec2(x1, 0.0), none, s, None), 0));
            continue;
        }
        let flags = if i == 2 { LinedefFlags::MID_MASKED } else { none };
        let next = sectors[i + 1];
        let ld = line(&mut b, vec2(x1, 0.0), vec2(x1, ROOM), flags, next, Some(s));
        sides[i + 1].push((ld, 0));
        sides[i].push((ld, 1));
    }

    let leaves: Vec<NodeRef> = sides.iter().map(|s| b.subsector(s)).collect();
    let mut tree = leaves[last];
    for i in (0..last).rev() {
        let x = ROOM * (i + 1) as f32;
        tree = b.node(vec2(x, 0.0), vec2(0.0, ROOM), tree, leaves[i]);
    }
    Ok(b.build()?)
}

fn demo_sprites(textures: &mut TextureBank) -> anyhow::Result<SpriteTable> {
    let mut table = SpriteTable::default();

    // imp: five rotations, three of them mirrored
    let mut rot = [0; 5];
    for (i, id) in rot.iter_mut().enumerate() {
        let name = format!("TROOA{}", i + 1);
        *id = textures.insert(name.clone(), Texture::new(name, 41, 57, 20, 57))?;
    }
    let lump = [rot[0], rot[1], rot[2], rot[3], rot[4], rot[3], rot[2], rot[1]];
    let flip = [false, false, false, false, false, true, true, true];
    table.push(SpriteDef {
        frames: vec![SpriteFrame::rotated(lump, flip)],
    });

    let barrel = textures.insert("BAR1A0", Texture::new("BAR1A0", 23, 32, 11, 30))?;
    table.push(SpriteDef {
        frames: vec![SpriteFrame::single(barrel, false)],
    });

    let ball = textures.insert("BAL1A0", Texture::new("BAL1A0", 13, 13, 6, 13))?;
    table.push(SpriteDef {
        frames: vec![SpriteFrame::single(ball, false)],
    });

    let pistol = textures.insert("PISGA0", Texture::new("PISGA0", 57, 62, -108, -106))?;
    table.push(SpriteDef {
        frames: vec![SpriteFrame::single(pistol, false)],
    });

    Ok(table)
}

const SPR_TROO: u16 = 0;
const SPR_BAR1: u16 = 1;
const SPR_BAL1: u16 = 2;
const SPR_PISG: u16 = 3;

fn populate(world: &mut hecs::World, level: &Level) -> hecs::Entity {
    let things = [
        (250.0, 128.0, SPR_TROO, 0, MobjFlags::SOLID),
        (256.0, 64.0, SPR_BAR1, 0, MobjFlags::SOLID),
        (500.0, 200.0, SPR_TROO, 0, MobjFlags::SOLID | MobjFlags::BLEND_ON),
        (515.0, 128.0, SPR_BAL1, FF_FULLBRIGHT, MobjFlags::MISSILE | MobjFlags::ALL_BLEND_FLAGS),
        (766.0, 128.0, SPR_TROO, 0, MobjFlags::SOLID),
        (1020.0, 128.0, SPR_BAR1, 0, MobjFlags::SOLID),
    ];
    for (x, y, sprite, frame, flags) in things {
        spawn_thing(world, level, x, y, PI, Anim::new(sprite, frame), flags);
    }

    let player = spawn_thing(
        world,
        level,
        128.0,
        128.0,
        0.0,
        Anim::new(SPR_TROO, 0),
        MobjFlags::SOLID,
    );
    let mut psp = PlayerSprites::default();
    psp.0[0] = PlayerSprite {
        anim: Some(Anim::new(SPR_PISG, 0)),
        ..PlayerSprite::default()
    };
    // inserting into a freshly spawned entity cannot fail
    let _ = world.insert_one(player, psp);
    player
}

/*───────────────────────── per-frame work ─────────────────────────*/

struct Demo {
    level: Level,
    sprites: SpriteTable,
    textures: TextureBank,
    world: hecs::World,
    player: hecs::Entity,
    vis: FrameVisibility,
    frags: SpriteFrags,
    draws: DrawList,
}

impl Demo {
    fn new(cfg: SpriteConfig) -> anyhow::Result<Self> {
        let level = demo_level().context("building demo level")?;
        let mut textures = TextureBank::default_with_checker();
        let sprites = demo_sprites(&mut textures).context("loading demo sprites")?;
        let mut world = hecs::World::new();
        let player = populate(&mut world, &level);
        info!(
            "level {}: {} subsectors, {} nodes, {} segs",
            level.name,
            level.subsectors.len(),
            level.nodes.len(),
            level.segs.len()
        );
        Ok(Self {
            level,
            sprites,
            textures,
            world,
            player,
            vis: FrameVisibility::default(),
            frags: SpriteFrags::new(cfg),
            draws: DrawList::default(),
        })
    }

    /// Build and "draw" one frame; returns the fragment statistics.
    fn frame(&mut self, camera: &Camera) -> FrameStats {
        self.textures.begin_frame();
        self.vis.collect(&self.level, camera);

        let scene = SpriteScene {
            level: &self.level,
            vis: &self.vis,
            world: &self.world,
            sprites: &self.sprites,
            camera,
            view_entity: Some(self.player),
            lerp: 1.0,
        };
        let stats = self.frags.build_frame(&scene, &mut self.textures);

        // back to front, sprites after each subsector's walls
        self.draws.clear();
        for draw_idx in (0..self.vis.len() as u16).rev() {
            self.frags.draw_subsector(draw_idx, &mut self.draws);
        }
        if let Some(view) = WeaponView::of_player(&self.world, self.player, &self.level, 1.0) {
            self.frags
                .draw_weapon(&view, &self.level, &self.sprites, &mut self.textures, &mut self.draws);
        }
        stats
    }
}

fn run_headless(demo: &mut Demo, frames: u32) -> anyhow::Result<()> {
    let mut camera = Camera::new(Vec3::new(128.0, 128.0, 41.0), 0.0, FRAC_PI_2);
    let mut out = std::io::stdout().lock();
    writeln!(out, "frame  yaw  subsecs things frags splits vetoed capped culled quads ui")?;
    for frame in 0..frames {
        let s = demo.frame(&camera);
        writeln!(
            out,
            "{frame:5} {:4.0} {:7} {:6} {:5} {:6} {:6} {:6} {:6} {:5} {:2}",
            camera.yaw.to_degrees(),
            demo.vis.len(),
            s.things,
            s.fragments,
            s.splits,
            s.vetoed,
            s.capped,
            s.culled,
            demo.draws.world_quads().count(),
            demo.draws.ui_sprites().count(),
        )?;
        camera.turn(std::f32::consts::TAU / frames.max(1) as f32);
    }
    Ok(())
}

/*───────────────────────── drawing helpers ─────────────────────────*/

struct View {
    min: Vec2,
    scale: f32,
    off: Vec2,
}

impl View {
    fn fit(level: &Level) -> Self {
        let (min, max) = level.vertices.iter().fold(
            (vec2(f32::MAX, f32::MAX), vec2(f32::MIN, f32::MIN)),
            |(lo, hi), v| (lo.min(v.pos), hi.max(v.pos)),
        );
        let size = max - min;
        let scale = (WIDTH as f32 / size.x).min(HEIGHT as f32 / size.y) * 0.9;
        let off = (vec2(WIDTH as f32, HEIGHT as f32) - size * scale) * 0.5;
        Self { min, scale, off }
    }

    fn to_screen(&self, v: Vec2) -> (i32, i32) {
        let p = (v - self.min) * self.scale + self.off;
        (p.x.round() as i32, HEIGHT as i32 - p.y.round() as i32)
    }

    fn line(&self, buf: &mut [u32], a: Vec2, b: Vec2, col: u32) {
        let (x0, y0) = self.to_screen(a);
        let (x1, y1) = self.to_screen(b);
        draw_line(buf, x0, y0, x1, y1, col);
    }
}

fn draw_line(buf: &mut [u32], mut x0: i32, mut y0: i32, x1: i32, y1: i32, col: u32) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if (0..WIDTH as i32).contains(&x0) && (0..HEIGHT as i32).contains(&y0) {
            buf[y0 as usize * WIDTH + x0 as usize] = col;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

const LEAF_COLOURS: [u32; 6] = [
    0x00FF4040, 0x0040FF40, 0x004080FF, 0x00FFFF40, 0x00FF40FF, 0x0040FFFF,
];

fn run_window(demo: &mut Demo) -> anyhow::Result<()> {
    let view = View::fit(&demo.level);
    let mut camera = Camera::new(Vec3::new(128.0, 128.0, 41.0), 0.0, FRAC_PI_2);

    let mut buf = vec![0u32; WIDTH * HEIGHT];
    let mut win = Window::new("sprite fragments", WIDTH, HEIGHT, WindowOptions::default())
        .context("opening window")?;
    win.set_target_fps(60);

    let speed = 128.0;
    let rot = PI; // 180°/s
    let dt = 1.0 / 60.0;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /*--- input --------------------------------------------------*/
        let mut fwd = 0.0;
        let mut side = 0.0;
        if win.is_key_down(Key::W) {
            fwd += speed * dt;
        }
        if win.is_key_down(Key::S) {
            fwd -= speed * dt;
        }
        if win.is_key_down(Key::A) {
            side -= speed * dt;
        }
        if win.is_key_down(Key::D) {
            side += speed * dt;
        }
        if win.is_key_down(Key::Left) {
            camera.turn(rot * dt);
        }
        if win.is_key_down(Key::Right) {
            camera.turn(-rot * dt);
        }
        camera.step(fwd, side);

        demo.frame(&camera);

        /*--- map ----------------------------------------------------*/
        buf.fill(0x00202020);
        for node in &demo.level.nodes {
            let o = node.origin();
            view.line(&mut buf, o, o + node.delta(), 0x00203080);
        }
        for seg in 0..demo.level.segs.len() {
            let (a, b) = demo.level.seg_line(seg as u16);
            let col = if demo.vis.seg_visible(seg as u16) { 0x00909090 } else { 0x00505050 };
            view.line(&mut buf, a, b, col);
        }

        /*--- fragments ---------------------------------------------*/
        for draw_idx in 0..demo.vis.len() as u16 {
            let col = LEAF_COLOURS[draw_idx as usize % LEAF_COLOURS.len()];
            for frag in demo.frags.subsector_frags(draw_idx) {
                view.line(&mut buf, frag.p1, frag.p2, col);
            }
        }

        /*--- camera -------------------------------------------------*/
        let eye = camera.pos().truncate();
        view.line(&mut buf, eye, eye + camera.forward() * 32.0, 0x00FFFFFF);

        win.update_with_buffer(&buf, WIDTH, HEIGHT)?;
    }
    Ok(())
}

/*──────────────────────────── main ────────────────────────────────*/
fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter(None, opts.verbose)
        .init();

    let cfg = SpriteConfig {
        aspect: opts.aspect,
        max_split_depth: opts.max_split_depth,
        ..SpriteConfig::default()
    };
    let mut demo = Demo::new(cfg)?;

    if opts.headless {
        run_headless(&mut demo, opts.frames)
    } else {
        run_window(&mut demo)
    }
}
