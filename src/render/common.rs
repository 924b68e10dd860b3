use glam::{Mat4, Vec3, Vec4};

use crate::draw::DrawCommand;
use crate::lighting::Attenuation;

/// Camera parameters consumed by the renderer's uniform buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    pub view: Mat4,
    pub projection: Mat4,
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraParams {
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// One light unit as configured for the frame.
///
/// `position.w == 0` marks a directional light whose `xyz` points at the light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    pub position: Vec4,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub attenuation: Attenuation,
    pub enabled: bool,
}

/// Lighting state consumed by the renderer's uniform buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightParams {
    pub global_ambient: Vec4,
    pub local_viewer: bool,
    /// Sun first, lamp second.
    pub sources: [LightSource; 2],
}

/// Sink for one frame's worth of work, called in frame-phase order.
pub trait RenderBackend {
    type Error;

    fn clear(&mut self, color: Vec4);
    fn set_camera(&mut self, camera: &CameraParams);
    fn set_lighting(&mut self, lighting: &LightParams);
    fn draw(&mut self, commands: &[DrawCommand]);
    fn present(&mut self) -> Result<(), Self::Error>;
}
