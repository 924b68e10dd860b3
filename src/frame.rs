use glam::Vec4;
use log::trace;

use crate::draw::DrawList;
use crate::lighting::Lighting;
use crate::render::{CameraParams, RenderBackend};
use crate::scene::Park;

/// Where a frame is in its fixed clear → camera → lights → scene → present run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePhase {
    #[default]
    Idle,
    Cleared,
    CameraSet,
    LitConfigured,
    SceneDrawn,
    Presented,
}

impl FramePhase {
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::Cleared,
            Self::Cleared => Self::CameraSet,
            Self::CameraSet => Self::LitConfigured,
            Self::LitConfigured => Self::SceneDrawn,
            Self::SceneDrawn => Self::Presented,
            Self::Presented => Self::Idle,
        }
    }
}

/// Walks a frame through its phases and counts completed frames.
#[derive(Debug, Default)]
pub struct FrameSequencer {
    phase: FramePhase,
    presented: u64,
}

impl FrameSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    fn advance(&mut self) {
        self.phase = self.phase.next();
        trace!("frame phase -> {:?}", self.phase);
    }

    /// Runs one full frame against `backend`.
    ///
    /// On a present failure the sequencer drops back to idle so the next
    /// tick starts a fresh frame.
    pub fn run<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        clear_color: Vec4,
        camera: &CameraParams,
        lighting: &Lighting,
        park: &Park,
    ) -> Result<(), B::Error> {
        debug_assert_eq!(self.phase, FramePhase::Idle);

        self.advance();
        backend.clear(clear_color);

        self.advance();
        backend.set_camera(camera);

        self.advance();
        backend.set_lighting(&lighting.configure());

        self.advance();
        let mut list = DrawList::new();
        park.draw(&mut list, lighting);
        backend.draw(list.commands());

        let presented = backend.present();
        if presented.is_ok() {
            self.advance();
            self.presented += 1;
        }
        self.phase = FramePhase::Idle;
        presented
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraState, Projection, Viewport};
    use crate::render::{RecordedCall, RecordingBackend};

    #[test]
    fn phases_cycle_back_to_idle() {
        let mut phase = FramePhase::Idle;
        for _ in 0..6 {
            phase = phase.next();
        }
        assert_eq!(phase, FramePhase::Idle);
        assert_eq!(FramePhase::SceneDrawn.next(), FramePhase::Presented);
    }

    #[test]
    fn frame_calls_backend_in_order() {
        let viewport = Viewport::new(800, 600);
        let projection = Projection::new(60.0, 0.1, 100.0, &viewport);
        let camera = CameraState::default().params(&projection);
        let mut backend = RecordingBackend::new();
        let mut frames = FrameSequencer::new();

        frames
            .run(
                &mut backend,
                Vec4::new(0.2, 0.2, 0.3, 1.0),
                &camera,
                &Lighting::dusk(),
                &Park::new(),
            )
            .unwrap();

        let order: Vec<_> = backend.calls().iter().map(RecordedCall::kind).collect();
        assert_eq!(order, ["clear", "camera", "lighting", "draw", "present"]);
        assert_eq!(frames.phase(), FramePhase::Idle);
        assert_eq!(frames.frames_presented(), 1);
    }
}
