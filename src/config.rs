use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Tunables for the park viewer. There is no config file; these are the
/// compiled-in values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Degrees of rotation per pixel of pointer travel.
    pub mouse_sensitivity: f32,
    /// World units per arrow-key press.
    pub move_step: f32,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Dusky blue sky behind the scene.
    pub clear_color: Vec4,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Dusk Park".to_string(),
            width: 800,
            height: 600,
            mouse_sensitivity: 0.3,
            move_step: 0.5,
            fov_y: 60.0,
            near: 0.1,
            far: 100.0,
            clear_color: Vec4::new(0.2, 0.2, 0.3, 1.0),
        }
    }
}
