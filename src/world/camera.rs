use glam::{Mat4, Vec2, Vec3, Vec4};

/// Player view-point in world space.
///
/// * Only **yaw** (heading) is simulated – Doom never tilts up/down.
/// * `pos.z` is the absolute eye height.
///
/// Map space is (x, y) on the ground with z up.  The projection works in
/// *render* space, which is y-up: map (x, y, z) becomes render (x, z, y).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: Vec3, // x,y in map-units; z = eye height
    pub yaw: f32,  // radians (0 = east, counter-clockwise)
    pub fov: f32,  // horizontal FoV (radians, typical 90–110°)
    pub aspect: f32,
}

const NEAR: f32 = 1.0;
const FAR: f32 = 32768.0;

impl Camera {
    /// Create a new camera at `pos`, facing `yaw`, with horizontal FoV `fov`.
    pub fn new(pos: Vec3, yaw: f32, fov: f32) -> Self {
        Self {
            pos,
            yaw,
            fov,
            aspect: 4.0 / 3.0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks on the X-Y plane.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(c, s) // 0 rad = +X (east), CCW positive
    }

    /// Unit vector pointing to the camera's right on the X-Y plane.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        // clockwise perpendicular of forward: (x, y) -> (y, -x)
        -self.forward().perp()
    }

    /// Horizontal axis of a camera-facing sprite, in map XY.
    ///
    /// Sprites only rotate about the vertical axis, so this is simply the
    /// camera's right vector.
    #[inline(always)]
    pub fn billboard_right(&self) -> Vec2 {
        self.right()
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe), preserving eye-height.
    pub fn step(&mut self, forward: f32, side: f32) {
        let f = self.forward();
        let r = self.right();
        self.pos.x += f.x * forward + r.x * side;
        self.pos.y += f.y * forward + r.y * side;
    }

    /// Rotate around Z-axis (positive = turn left).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
    }

    /*───────────────── projection helpers ─────────────────*/

    /// Combined view-projection matrix in render space.
    pub fn view_proj(&self) -> Mat4 {
        let eye = to_render(self.pos);
        let f = self.forward();
        let dir = Vec3::new(f.x, 0.0, f.y);
        let fov_y = 2.0 * ((self.fov * 0.5).tan() / self.aspect).atan();
        Mat4::perspective_rh(fov_y, self.aspect, NEAR, FAR) * Mat4::look_to_rh(eye, dir, Vec3::Y)
    }
}

/// Map-space point (x, y, z-up) to render space (x, y-up, z).
#[inline(always)]
pub fn to_render(p: Vec3) -> Vec3 {
    Vec3::new(p.x, p.z, p.y)
}

/// Clip-space depth of a render-space point, without the perspective
/// divide.  Grows with distance in front of the camera.
#[inline]
pub fn clip_depth(view_proj: &Mat4, p: Vec3) -> f32 {
    (*view_proj * Vec4::new(p.x, p.y, p.z, 1.0)).z
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
