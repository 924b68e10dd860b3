//! A small dusk-lit park walked through with a first-person camera.
//!
//! The crate keeps the scene, camera, lighting and frame sequencing free of
//! any window or GPU handle so they can be driven headless. The wgpu
//! renderer in [`render::native`] and the winit glue in the binary are the
//! only pieces that touch the platform.

pub mod app;
pub mod camera;
pub mod config;
pub mod draw;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod lighting;
pub mod material;
pub mod render;
pub mod scene;

pub use app::{Control, ParkApp, SceneHandler};
pub use camera::{CameraState, MouseLook, Movement, Projection, Viewport};
pub use config::Settings;
pub use draw::{DrawCommand, DrawList, Primitive};
pub use frame::{FramePhase, FrameSequencer};
pub use geometry::{Cylinder, Mesh, Vertex};
pub use input::{KeyAction, KeyCode, NamedKey};
pub use lighting::Lighting;
pub use material::Material;
pub use render::{
    CameraParams, LightParams, RecordedCall, RecordingBackend, RenderBackend, Renderer,
};
pub use scene::Park;
