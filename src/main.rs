use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use pollster::block_on;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey as WinitNamedKey};
use winit::window::{Window, WindowId};

use dusk_park::{
    Control, KeyCode, NamedKey, ParkApp, RecordingBackend, Renderer, SceneHandler, Settings,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse();
    let settings = Settings::default();

    if options.summary_only {
        return run_headless(settings);
    }

    match run_interactive(settings.clone()) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<PlatformError>().is_some() => {
            eprintln!(
                "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
            );
            run_headless(settings)
        }
        Err(err) => Err(err),
    }
}

/// Renders one frame into the recording backend and prints what was drawn.
fn run_headless(settings: Settings) -> Result<()> {
    let mut app = ParkApp::new(settings);
    let mut backend = RecordingBackend::new();
    match app.on_frame(&mut backend) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    print!("{}", backend.summary());
    Ok(())
}

fn run_interactive(settings: Settings) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| PlatformError::EventLoop(err.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = WindowHandler {
        app: ParkApp::new(settings),
        window: None,
        renderer: None,
        init_error: None,
        last_error: None,
    };
    event_loop
        .run_app(&mut handler)
        .context("event loop terminated abnormally")?;

    if let Some(err) = handler.init_error.take() {
        return Err(err.into());
    }
    if let Some(err) = handler.last_error.take() {
        return Err(err);
    }
    Ok(())
}

/// Platform failures that leave no window to render into.
#[derive(Debug, Error)]
enum PlatformError {
    #[error("failed to initialize event loop: {0}")]
    EventLoop(String),
    #[error("failed to initialize window: {0}")]
    Window(String),
}

struct WindowHandler {
    app: ParkApp,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    init_error: Option<PlatformError>,
    last_error: Option<anyhow::Error>,
}

impl WindowHandler {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let settings = self.app.settings();
        let attributes = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(LogicalSize::new(settings.width, settings.height))
            .with_resizable(true);
        let window = event_loop
            .create_window(attributes)
            .map_err(|err| PlatformError::Window(err.to_string()))?;
        let window = Arc::new(window);

        let size = window.inner_size();
        self.app.on_resize(size.width, size.height);
        window.set_cursor_visible(false);
        let home = self.app.recenter_pointer();
        warp_pointer(&window, home);
        info!("opened window {}x{}", size.width, size.height);

        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        if let Err(err) = self.app.on_frame(renderer) {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    renderer.reconfigure();
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    warn!("surface timeout; retrying next frame");
                }
                other => {
                    error!("failed to acquire frame: {other}");
                }
            }
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.last_error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for WindowHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.init_error = Some(err);
            event_loop.exit();
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };
        match block_on(Renderer::new(Arc::clone(window))) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(err) => self.fail(event_loop, err.context("failed to initialize renderer")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                self.app.on_resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let Some(key) = map_key(&event.logical_key) else {
                    return;
                };
                if self.app.on_key(key, event.repeat) == Control::Exit {
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(home) = self.app.on_mouse_move(position.x, position.y) {
                    warp_pointer(&window, home);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.render() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

fn warp_pointer(window: &Window, (x, y): (f64, f64)) {
    if let Err(err) = window.set_cursor_position(PhysicalPosition::new(x, y)) {
        warn!("could not re-center pointer: {err}");
    }
}

fn map_key(key: &Key) -> Option<KeyCode> {
    match key {
        Key::Named(named) => {
            let named = match named {
                WinitNamedKey::ArrowLeft => NamedKey::Left,
                WinitNamedKey::ArrowRight => NamedKey::Right,
                WinitNamedKey::ArrowUp => NamedKey::Up,
                WinitNamedKey::ArrowDown => NamedKey::Down,
                WinitNamedKey::Escape => NamedKey::Escape,
                _ => return None,
            };
            Some(KeyCode::Named(named))
        }
        Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(KeyCode::character(ch)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[derive(Debug, Default)]
struct CliOptions {
    summary_only: bool,
}

impl CliOptions {
    /// Anything other than `--summary-only` is left for the platform layer.
    fn parse() -> Self {
        let mut options = Self::default();
        for arg in env::args().skip(1) {
            if arg == "--summary-only" {
                options.summary_only = true;
            }
        }
        options
    }
}
