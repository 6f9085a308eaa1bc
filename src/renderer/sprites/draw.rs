use glam::{Vec2, Vec3};

use super::{SpriteFrag, SpriteFrags};
use crate::renderer::{DrawSink, WorldQuad, WorldVertex};
use crate::world::camera::to_render;

impl SpriteFrags {
    /// Draw the fragments filed under draw subsector `draw_idx`, farthest
    /// first.  Fragments at equal depth keep their list order.
    pub fn draw_subsector(&mut self, draw_idx: u16, sink: &mut impl DrawSink) {
        debug_assert!((draw_idx as usize) < self.store.draw_subsec_count());

        let Self {
            store,
            sort_scratch,
            ..
        } = self;

        sort_scratch.extend(store.leaf(draw_idx));
        sort_scratch.sort_by(|&a, &b| store.get(b).depth.total_cmp(&store.get(a).depth));

        for &idx in sort_scratch.iter() {
            let frag = store.get(idx);
            sink.set_pipeline(frag.pipeline);
            sink.add_world_quad(&frag_quad(frag));
        }

        sort_scratch.clear();
    }
}

/// Quad for a fragment, corners bottom-left, top-left, top-right,
/// bottom-right.
fn frag_quad(frag: &SpriteFrag) -> WorldQuad {
    let corner = |p: Vec2, y: f32, u: f32, v: f32| WorldVertex {
        pos: to_render(Vec3::new(p.x, p.y, y)),
        uv: Vec2::new(u, v),
        color: frag.color,
    };
    WorldQuad {
        corners: [
            corner(frag.p1, frag.yb, frag.ul, frag.vb),
            corner(frag.p1, frag.yt, frag.ul, frag.vt),
            corner(frag.p2, frag.yt, frag.ur, frag.vt),
            corner(frag.p2, frag.yb, frag.ur, frag.vb),
        ],
        window: frag.window,
        st_mul: frag.st_mul,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::sprites::frag::test_frag;
    use crate::renderer::{DrawList, DrawPipeline};

    fn frags_with(depths: &[(f32, f32)]) -> SpriteFrags {
        let mut frags = SpriteFrags::default();
        frags.store.reset(1);
        // (depth, tag): the tag goes in `ul` so order can be checked
        for &(depth, tag) in depths {
            let mut f = test_frag(Vec2::ZERO, Vec2::X);
            f.depth = depth;
            f.ul = tag;
            frags.store.push_front(0, f);
        }
        frags
    }

    #[test]
    fn draws_back_to_front_and_keeps_ties_in_list_order() {
        // list order is newest first: tags 4, 3, 2, 1, 0
        let mut frags = frags_with(&[(10.0, 0.0), (30.0, 1.0), (20.0, 2.0), (30.0, 3.0), (5.0, 4.0)]);
        let mut list = DrawList::default();
        frags.draw_subsector(0, &mut list);

        let tags: Vec<f32> = list.world_quads().map(|(_, q)| q.corners[0].uv.x).collect();
        assert_eq!(tags, [3.0, 1.0, 2.0, 0.0, 4.0]);
        assert!(frags.sort_scratch.is_empty());
    }

    #[test]
    fn quad_corners_follow_the_fragment() {
        let mut frags = SpriteFrags::default();
        frags.store.reset(1);
        let mut f = test_frag(Vec2::new(10.0, 20.0), Vec2::new(50.0, 20.0));
        f.pipeline = DrawPipeline::SpriteAdditive;
        frags.store.push_front(0, f);

        let mut list = DrawList::default();
        frags.draw_subsector(0, &mut list);
        let (pipe, quad) = list.world_quads().next().unwrap();
        assert_eq!(pipe, DrawPipeline::SpriteAdditive);

        let pos: Vec<Vec3> = quad.corners.iter().map(|c| c.pos).collect();
        assert_eq!(
            pos,
            [
                Vec3::new(10.0, 0.0, 20.0),
                Vec3::new(10.0, 56.0, 20.0),
                Vec3::new(50.0, 56.0, 20.0),
                Vec3::new(50.0, 0.0, 20.0),
            ]
        );
        let uv: Vec<Vec2> = quad.corners.iter().map(|c| c.uv).collect();
        assert_eq!(
            uv,
            [
                Vec2::new(0.0, 56.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(40.0, 0.0),
                Vec2::new(40.0, 56.0),
            ]
        );
        assert!(quad.corners.iter().all(|c| c.color == f.color));
    }

    #[test]
    fn empty_subsector_draws_nothing() {
        let mut frags = frags_with(&[]);
        let mut list = DrawList::default();
        frags.draw_subsector(0, &mut list);
        assert!(list.calls.is_empty());
    }
}
