use std::convert::Infallible;

use glam::{Vec3, Vec4};

use super::common::{CameraParams, LightParams, RenderBackend};
use crate::draw::DrawCommand;
use crate::lighting::on_off;

/// Backend call captured by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Clear(Vec4),
    Camera(CameraParams),
    Lighting(LightParams),
    Draw(Vec<DrawCommand>),
    Present,
}

impl RecordedCall {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Clear(_) => "clear",
            Self::Camera(_) => "camera",
            Self::Lighting(_) => "lighting",
            Self::Draw(_) => "draw",
            Self::Present => "present",
        }
    }
}

/// Headless backend that keeps every call for inspection.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<RecordedCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Human readable digest of the last presented frame.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for call in &self.calls {
            match call {
                RecordedCall::Clear(color) => out.push_str(&format!(
                    "Clear color=({:.2}, {:.2}, {:.2})\n",
                    color.x, color.y, color.z
                )),
                RecordedCall::Camera(camera) => out.push_str(&format!(
                    "Camera pos={} target={}\n",
                    triple(camera.position),
                    triple(camera.target)
                )),
                RecordedCall::Lighting(lighting) => {
                    let [sun, lamp] = lighting.sources;
                    out.push_str(&format!(
                        "Lights sun={} lamp={}\n",
                        on_off(sun.enabled),
                        on_off(lamp.enabled)
                    ));
                }
                RecordedCall::Draw(commands) => {
                    out.push_str(&format!("Drew {} primitives:\n", commands.len()));
                    for command in commands {
                        out.push_str(&format!(
                            " - {} {} at={} emission={}\n",
                            command.label,
                            command.primitive.mesh_key(),
                            triple(command.model.w_axis.truncate()),
                            triple(command.material.emission.truncate())
                        ));
                    }
                }
                RecordedCall::Present => out.push_str("Presented\n"),
            }
        }
        out
    }
}

fn triple(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl RenderBackend for RecordingBackend {
    type Error = Infallible;

    fn clear(&mut self, color: Vec4) {
        self.calls.clear();
        self.calls.push(RecordedCall::Clear(color));
    }

    fn set_camera(&mut self, camera: &CameraParams) {
        self.calls.push(RecordedCall::Camera(*camera));
    }

    fn set_lighting(&mut self, lighting: &LightParams) {
        self.calls.push(RecordedCall::Lighting(*lighting));
    }

    fn draw(&mut self, commands: &[DrawCommand]) {
        self.calls.push(RecordedCall::Draw(commands.to_vec()));
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.calls.push(RecordedCall::Present);
        Ok(())
    }
}
