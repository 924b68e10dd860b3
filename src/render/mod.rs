mod common;
pub mod native;
pub mod recording;

pub use common::{CameraParams, LightParams, LightSource, RenderBackend};
pub use native::Renderer;
pub use recording::{RecordedCall, RecordingBackend};
