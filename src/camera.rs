//! First-person camera: yaw/pitch mouse look, walking on the ground plane,
//! and the perspective projection derived from the window size.

use glam::{Mat4, Vec3};
use log::debug;

use crate::render::CameraParams;

/// Pitch limit in degrees; looking straight up or down would flip the view.
pub const PITCH_LIMIT: f32 = 89.0;

/// Walking directions triggered by the arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Position plus yaw/pitch in degrees. Yaw is measured from -Z towards +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CameraState {
    /// Standing at eye height a few steps back from the scene.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 5.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl CameraState {
    /// Applies a pointer delta; moving the pointer up looks up.
    pub fn rotate(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Unit view direction.
    pub fn direction(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        Vec3::new(yaw_sin * pitch_cos, pitch_sin, -yaw_cos * pitch_cos)
    }

    /// Horizontal forward direction; pitch never moves the camera vertically.
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        Vec3::new(sin, 0.0, -cos)
    }

    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        Vec3::new(cos, 0.0, sin)
    }

    pub fn step(&mut self, movement: Movement, distance: f32) {
        let offset = match movement {
            Movement::Forward => self.forward(),
            Movement::Backward => -self.forward(),
            Movement::Right => self.right(),
            Movement::Left => -self.right(),
        };
        self.position += offset * distance;
    }

    /// Point one unit ahead along the view direction.
    pub fn look_target(&self) -> Vec3 {
        self.position + self.direction()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_target(), Vec3::Y)
    }

    pub fn params(&self, projection: &Projection) -> CameraParams {
        CameraParams {
            view: self.view_matrix(),
            projection: projection.matrix(),
            position: self.position,
            target: self.look_target(),
        }
    }
}

/// Window dimensions in physical pixels. Height never drops below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height: height.max(1),
        }
    }

    pub fn update(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Pixel the pointer is parked on between mouse events.
    pub fn center(&self) -> (f64, f64) {
        ((self.width / 2) as f64, (self.height / 2) as f64)
    }
}

/// Perspective projection with a vertical field of view in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(fov_y: f32, near: f32, far: f32, viewport: &Viewport) -> Self {
        Self {
            fov_y,
            aspect: viewport.aspect(),
            near,
            far,
        }
    }

    pub fn set_viewport(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y.to_radians(),
            self.aspect.max(0.01),
            self.near,
            self.far,
        )
    }
}

/// Turns absolute pointer positions into look deltas and keeps the pointer
/// pinned to the viewport centre so the deltas never run out of room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseLook {
    origin: (f64, f64),
    pub sensitivity: f32,
}

impl MouseLook {
    pub fn new(viewport: &Viewport, sensitivity: f32) -> Self {
        Self {
            origin: viewport.center(),
            sensitivity,
        }
    }

    /// Moves the look origin to the viewport centre and returns it, for
    /// when the pointer is placed there without a mouse event.
    pub fn recenter(&mut self, viewport: &Viewport) -> (f64, f64) {
        self.origin = viewport.center();
        self.origin
    }

    /// Rotates the camera and returns where the pointer should be warped to,
    /// if anywhere.
    pub fn on_pointer(
        &mut self,
        camera: &mut CameraState,
        viewport: &Viewport,
        x: f64,
        y: f64,
    ) -> Option<(f64, f64)> {
        let dx = (x - self.origin.0) as f32;
        let dy = (y - self.origin.1) as f32;
        camera.rotate(dx, dy, self.sensitivity);

        let center = viewport.center();
        if (x, y) == center {
            return None;
        }
        self.origin = center;
        debug!("warping pointer from ({x}, {y}) to {center:?}");
        Some(center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(a.distance(b) < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = CameraState::default();
        assert_vec_eq(camera.direction(), Vec3::NEG_Z);
        assert_vec_eq(camera.look_target(), Vec3::new(0.0, 1.0, 4.0));
    }

    #[test]
    fn direction_is_unit_length() {
        let mut camera = CameraState::default();
        for yaw in (0..360).step_by(7) {
            for pitch in (-89..=89).step_by(5) {
                camera.yaw = yaw as f32;
                camera.pitch = pitch as f32;
                assert!((camera.direction().length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut camera = CameraState::default();
        camera.rotate(0.0, -10_000.0, 0.3);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.rotate(0.0, 1.0e9, 0.3);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
        for dy in [-500.0, 37.0, 1200.0, -3.5] {
            camera.rotate(12.0, dy, 0.3);
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&camera.pitch));
        }
    }

    #[test]
    fn dragging_right_and_up_turns_right_and_up() {
        let mut camera = CameraState::default();
        camera.rotate(10.0, -10.0, 0.3);
        assert!((camera.yaw - 3.0).abs() < 1e-6);
        assert!((camera.pitch - 3.0).abs() < 1e-6);
    }

    #[test]
    fn walking_ignores_pitch() {
        let mut camera = CameraState::default();
        camera.pitch = -80.0;
        camera.step(Movement::Forward, 0.5);
        assert_vec_eq(camera.position, Vec3::new(0.0, 1.0, 4.5));
        camera.step(Movement::Backward, 0.5);
        assert_vec_eq(camera.position, Vec3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn strafing_is_perpendicular_to_forward() {
        let mut camera = CameraState {
            yaw: 90.0,
            ..CameraState::default()
        };
        assert_vec_eq(camera.forward(), Vec3::X);
        assert_vec_eq(camera.right(), Vec3::Z);
        camera.step(Movement::Left, 0.5);
        assert_vec_eq(camera.position, Vec3::new(0.0, 1.0, 4.5));
        assert!(camera.forward().dot(camera.right()).abs() < 1e-6);
    }

    #[test]
    fn zero_height_viewport_is_clamped() {
        let viewport = Viewport::new(800, 0);
        assert_eq!(viewport.height(), 1);
        assert_eq!(viewport.aspect(), 800.0);

        let narrow = Viewport::new(0, 600);
        assert_eq!(narrow.aspect(), 0.0);
        let projection = Projection::new(60.0, 0.1, 100.0, &narrow);
        assert!(projection.matrix().is_finite());
    }

    #[test]
    fn pointer_recenters_after_motion() {
        let viewport = Viewport::new(800, 600);
        let mut camera = CameraState::default();
        let mut look = MouseLook::new(&viewport, 0.3);

        let warp = look.on_pointer(&mut camera, &viewport, 410.0, 300.0);
        assert_eq!(warp, Some((400.0, 300.0)));
        assert!((camera.yaw - 3.0).abs() < 1e-6);

        // The warp itself arrives as a motion event at the centre.
        assert_eq!(look.on_pointer(&mut camera, &viewport, 400.0, 300.0), None);
        assert!((camera.yaw - 3.0).abs() < 1e-6);
    }

    #[test]
    fn recentring_follows_a_new_viewport() {
        let mut viewport = Viewport::new(800, 600);
        let mut camera = CameraState::default();
        let mut look = MouseLook::new(&viewport, 0.3);

        viewport.update(1600, 1200);
        assert_eq!(look.recenter(&viewport), (800.0, 600.0));
        assert_eq!(look.on_pointer(&mut camera, &viewport, 800.0, 600.0), None);
        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 0.0);
    }
}
