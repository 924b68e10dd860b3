//! Application state and the callbacks the windowing layer drives.

use log::{debug, info};

use crate::camera::{CameraState, MouseLook, Projection, Viewport};
use crate::config::Settings;
use crate::frame::{FramePhase, FrameSequencer};
use crate::input::{KeyAction, KeyCode};
use crate::lighting::Lighting;
use crate::render::{CameraParams, RenderBackend};
use crate::scene::Park;

/// Whether the event loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Callbacks a windowing layer dispatches to, one at a time, on one thread.
pub trait SceneHandler {
    fn on_frame<B: RenderBackend>(&mut self, backend: &mut B) -> Result<(), B::Error>;
    fn on_resize(&mut self, width: u32, height: u32);
    fn on_key(&mut self, key: KeyCode, repeat: bool) -> Control;
    /// Returns the position the pointer should be warped to, if any.
    fn on_mouse_move(&mut self, x: f64, y: f64) -> Option<(f64, f64)>;
}

/// Everything the park viewer mutates, owned by a single context.
#[derive(Debug)]
pub struct ParkApp {
    settings: Settings,
    camera: CameraState,
    mouse: MouseLook,
    lighting: Lighting,
    viewport: Viewport,
    projection: Projection,
    park: Park,
    frames: FrameSequencer,
}

impl ParkApp {
    pub fn new(settings: Settings) -> Self {
        let viewport = Viewport::new(settings.width, settings.height);
        let projection = Projection::new(settings.fov_y, settings.near, settings.far, &viewport);
        let mouse = MouseLook::new(&viewport, settings.mouse_sensitivity);
        Self {
            settings,
            camera: CameraState::default(),
            mouse,
            lighting: Lighting::dusk(),
            viewport,
            projection,
            park: Park::new(),
            frames: FrameSequencer::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn frame_phase(&self) -> FramePhase {
        self.frames.phase()
    }

    /// Resets the look origin to the viewport centre and returns it. Call
    /// after warping the pointer there outside of a mouse event.
    pub fn recenter_pointer(&mut self) -> (f64, f64) {
        self.mouse.recenter(&self.viewport)
    }

    pub fn camera_params(&self) -> CameraParams {
        self.camera.params(&self.projection)
    }

    fn apply(&mut self, action: KeyAction) -> Control {
        match action {
            KeyAction::Quit => {
                info!("escape pressed, leaving the park");
                return Control::Exit;
            }
            KeyAction::ToggleLamp => {
                self.lighting.toggle_lamp();
            }
            KeyAction::ToggleSun => {
                self.lighting.toggle_sun();
            }
            KeyAction::Move(movement) => {
                self.camera.step(movement, self.settings.move_step);
                debug!("camera moved {movement:?} to {:?}", self.camera.position);
            }
        }
        Control::Continue
    }
}

impl SceneHandler for ParkApp {
    fn on_frame<B: RenderBackend>(&mut self, backend: &mut B) -> Result<(), B::Error> {
        let camera = self.camera_params();
        self.frames.run(
            backend,
            self.settings.clear_color,
            &camera,
            &self.lighting,
            &self.park,
        )
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport.update(width, height);
        self.projection.set_viewport(&self.viewport);
        info!(
            "viewport {}x{} aspect {:.3}",
            self.viewport.width(),
            self.viewport.height(),
            self.projection.aspect
        );
    }

    fn on_key(&mut self, key: KeyCode, repeat: bool) -> Control {
        match KeyAction::from_key(key) {
            Some(action) if !repeat || action.repeats() => self.apply(action),
            _ => Control::Continue,
        }
    }

    fn on_mouse_move(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.mouse.on_pointer(&mut self.camera, &self.viewport, x, y)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::input::NamedKey;
    use crate::render::{RecordedCall, RecordingBackend};
    use crate::material::NO_EMISSION;
    use crate::scene::LampPost;

    fn app() -> ParkApp {
        ParkApp::new(Settings::default())
    }

    fn globe(backend: &RecordingBackend) -> crate::draw::DrawCommand {
        backend
            .calls()
            .iter()
            .find_map(|call| match call {
                RecordedCall::Draw(commands) => {
                    commands.iter().find(|c| c.label == "post.globe").copied()
                }
                _ => None,
            })
            .expect("globe drawn")
    }

    #[test]
    fn escape_exits() {
        let mut app = app();
        assert_eq!(
            app.on_key(KeyCode::Named(NamedKey::Escape), false),
            Control::Exit
        );
    }

    #[test]
    fn lamp_key_turns_lamp_off_and_dims_globe() {
        let mut app = app();
        let mut backend = RecordingBackend::new();

        assert_eq!(app.on_key(KeyCode::character('a'), false), Control::Continue);
        assert!(!app.lighting().lamp.enabled);
        assert!(app.lighting().sun.enabled);

        app.on_frame(&mut backend).unwrap();
        let globe = globe(&backend);
        assert_eq!(globe.material.diffuse, LampPost::GLOBE_OFF);
        assert_eq!(globe.material.emission, NO_EMISSION);
    }

    #[test]
    fn held_toggle_key_does_not_flicker() {
        let mut app = app();
        app.on_key(KeyCode::character('S'), false);
        app.on_key(KeyCode::character('S'), true);
        app.on_key(KeyCode::character('S'), true);
        assert!(!app.lighting().sun.enabled);
    }

    #[test]
    fn held_arrow_keeps_walking() {
        let mut app = app();
        app.on_key(KeyCode::Named(NamedKey::Up), false);
        app.on_key(KeyCode::Named(NamedKey::Up), true);
        assert!(app.camera().position.distance(Vec3::new(0.0, 1.0, 4.0)) < 1e-5);
    }

    #[test]
    fn resize_to_zero_height_is_safe() {
        let mut app = app();
        app.on_resize(0, 600);
        assert_eq!(app.projection().aspect, 0.0);
        app.on_resize(800, 0);
        assert_eq!(app.viewport().height(), 1);
        assert_eq!(app.projection().aspect, 800.0);
        assert!(app.camera_params().view_proj().is_finite());
    }

    #[test]
    fn mouse_uses_resized_center() {
        let mut app = app();
        app.on_resize(1000, 500);
        assert_eq!(app.on_mouse_move(400.0, 300.0), Some((500.0, 250.0)));
        assert_eq!(app.on_mouse_move(500.0, 250.0), None);
    }

    #[test]
    fn window_opening_at_another_size_keeps_the_view_level() {
        let mut app = app();
        app.on_resize(1600, 1200);
        let (x, y) = app.recenter_pointer();
        assert_eq!((x, y), (800.0, 600.0));
        assert_eq!(app.on_mouse_move(x, y), None);
        assert_eq!(app.camera().yaw, 0.0);
        assert_eq!(app.camera().pitch, 0.0);
    }

    #[test]
    fn frame_reports_camera_and_lights() {
        let mut app = app();
        let mut backend = RecordingBackend::new();
        app.on_frame(&mut backend).unwrap();
        let summary = backend.summary();
        assert!(summary.contains("Camera pos=(0.00, 1.00, 5.00) target=(0.00, 1.00, 4.00)"));
        assert!(summary.contains("Lights sun=on lamp=on"));
        assert!(summary.contains("Drew 11 primitives:"));
        assert_eq!(app.frame_phase(), FramePhase::Idle);
    }
}
