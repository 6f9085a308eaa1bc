//! Hand-built maps shared by the unit tests.
//!
//! A *corridor* is a row of 128×128 rooms along +x.  Room `i` spans
//! `x ∈ [128·i, 128·(i+1)]`, `y ∈ [0, 128]` and is subsector `i`.  The
//! root partition sits at x = 128, each node's front child is the part
//! with larger x.

use glam::{Vec2, vec2};

use crate::world::{
    bsp::NodeRef,
    builder::LevelBuilder,
    geometry::{Level, LinedefFlags, Sector, SectorId, SubsectorId},
    visibility::FrameVisibility,
};

pub const ROOM: f32 = 128.0;
pub const LEFT: SubsectorId = 0;
pub const RIGHT: SubsectorId = 1;

/// What separates a room from the next one.
#[derive(Clone, Copy, Debug)]
pub enum Divider {
    /// Two-sided line, same heights both sides.
    Open,
    /// Back-to-back one-sided walls.
    Wall,
    /// Two-sided line with a masked mid texture (bars, grates).
    Masked,
    /// Two-sided line, next room's floor raised to the given height.
    Step(f32),
}

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

pub fn corridor(dividers: &[Divider]) -> Level {
    let rooms = dividers.len() + 1;
    let mut b = LevelBuilder::new("CORRIDOR");

    let sectors: Vec<SectorId> = (0..rooms)
        .map(|i| {
            let floor = match i.checked_sub(1).map(|d| dividers[d]) {
                Some(Divider::Step(h)) => h,
                _ => 0.0,
            };
            b.sector(Sector::new(floor, ROOM, 255))
        })
        .collect();

    let mut sides: Vec<Vec<(u16, u16)>> = vec![Vec::new(); rooms];
    for i in 0..rooms {
        let (x0, x1) = (ROOM * i as f32, ROOM * (i + 1) as f32);
        let s = sectors[i];
        let none = LinedefFlags::empty();
        sides[i].push((line(&mut b, vec2(x0, ROOM), vec2(x1, ROOM), none, s, None), 0));
        sides[i].push((line(&mut b, vec2(x1, 0.0), vec2(x0, 0.0), none, s, None), 0));
        if i == 0 {
            sides[i].push((line(&mut b, vec2(x0, 0.0), vec2(x0, ROOM), none, s, None), 0));
        }
        if i == rooms - 1 {
            sides[i].push((line(&mut b, vec2(x1, ROOM), vec2(x1, 0.0), none, s, None), 0));
            continue;
        }

        let next = sectors[i + 1];
        let (bottom, top) = (vec2(x1, 0.0), vec2(x1, ROOM));
        match dividers[i] {
            Divider::Wall => {
                let a = line(&mut b, bottom, top, none, next, None);
                let c = line(&mut b, top, bottom, none, s, None);
                sides[i + 1].push((a, 0));
                sides[i].push((c, 0));
            }
            d => {
                let flags = match d {
                    Divider::Masked => LinedefFlags::MID_MASKED,
                    _ => none,
                };
                let ld = line(&mut b, bottom, top, flags, next, Some(s));
                sides[i + 1].push((ld, 0));
                sides[i].push((ld, 1));
            }
        }
    }

    let leaves: Vec<NodeRef> = sides.iter().map(|s| b.subsector(s)).collect();

    // right-most partition first so parents come after their children
    let mut tree = leaves[rooms - 1];
    for i in (0..rooms - 1).rev() {
        let x = ROOM * (i + 1) as f32;
        tree = b.node(vec2(x, 0.0), vec2(0.0, ROOM), tree, leaves[i]);
    }

    b.build().expect("corridor map is well formed")
}

pub fn two_rooms(divider: Divider) -> Level {
    corridor(&[divider])
}

/// Every subsector drawable (in id order) and every seg visible.
pub fn all_visible(level: &Level) -> FrameVisibility {
    let mut vis = FrameVisibility::default();
    vis.reset(level);
    for ss in 0..level.subsectors.len() as SubsectorId {
        vis.add_subsector(ss);
    }
    for seg in 0..level.segs.len() as u16 {
        vis.mark_seg_visible(seg);
    }
    vis
}
