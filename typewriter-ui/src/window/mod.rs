//! Writer window creation and event handling

mod config;
mod platform;

pub use config::WindowConfig;
use config::{clamp_to_max_size, MAX_TEXTURE_SIZE};

use std::time::Instant;

use tao::{
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowBuilder},
};
use thiserror::Error;

use crate::renderer::{Renderer, RendererError};
use platform::configure_window;

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("Failed to create window: {0}")]
    WindowCreationFailed(#[from] tao::error::OsError),
    #[error("Renderer error: {0}")]
    RendererError(#[from] RendererError),
}

/// Internal struct to hold window data with proper ownership.
struct WindowData {
    window: Window,
    config: WindowConfig,
    last_size: (u32, u32),
    cursor_position: Option<PhysicalPosition<f64>>,
    is_focused: bool,
}

/// A window hosting typewriter content.
pub struct WriterWindow {
    data: Box<WindowData>,
    renderer: Option<Renderer<'static>>,
}

impl WriterWindow {
    /// Create a new writer window with the given configuration.
    pub fn new(event_loop: &EventLoop<()>, config: WindowConfig) -> Result<Self, WindowError> {
        let (width, height) = clamp_to_max_size(config.width, config.height, MAX_TEXTURE_SIZE);
        if width != config.width || height != config.height {
            log::warn!(
                "Window size {}x{} exceeds GPU limit, clamped to {}x{}",
                config.width,
                config.height,
                width,
                height
            );
        }

        let transparent = config.is_transparent();
        let window = WindowBuilder::new()
            .with_inner_size(LogicalSize::new(width, height))
            .with_transparent(transparent)
            .with_decorations(!config.borderless)
            .with_always_on_top(config.always_on_top)
            .with_title(&config.title)
            .build(event_loop)?;

        configure_window(&window, transparent);

        let window_size = window.inner_size();
        let background = config.background;

        let data = Box::new(WindowData {
            window,
            config,
            last_size: (window_size.width, window_size.height),
            cursor_position: None,
            is_focused: false,
        });

        // SAFETY: The window lives in the Box which won't move. We transmute the lifetime
        // to 'static because the Box lives as long as WriterWindow.
        let renderer = unsafe {
            let window_ref: &'static Window = std::mem::transmute(&data.window);
            Renderer::new(window_ref, window_size.width, window_size.height, background)?
        };

        Ok(Self {
            data,
            renderer: Some(renderer),
        })
    }

    /// Get a reference to the underlying tao window.
    pub fn window(&self) -> &Window {
        &self.data.window
    }

    /// Get the window configuration.
    pub fn config(&self) -> &WindowConfig {
        &self.data.config
    }

    /// Request a redraw of the window.
    pub fn request_redraw(&self) {
        self.data.window.request_redraw();
    }

    /// Display scale factor (1.0 standard, 2.0 Retina)
    pub fn scale_factor(&self) -> f32 {
        self.data.window.scale_factor() as f32
    }

    /// Surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        self.data.last_size
    }

    /// Handle window resize.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        let (width, height) = clamp_to_max_size(width.max(1), height.max(1), MAX_TEXTURE_SIZE);
        self.data.last_size = (width, height);

        if let Some(ref mut renderer) = self.renderer {
            renderer.resize(width, height);
        }
    }

    /// Handle focus change.
    pub fn handle_focus(&mut self, focused: bool) {
        self.data.is_focused = focused;
    }

    /// Check if the window is focused.
    pub fn is_focused(&self) -> bool {
        self.data.is_focused
    }

    /// Track the mouse cursor position.
    pub fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.data.cursor_position = Some(position);
    }

    /// Forget the mouse cursor position.
    pub fn handle_cursor_left(&mut self) {
        self.data.cursor_position = None;
    }

    /// Current mouse cursor position, if inside the window.
    pub fn cursor_position(&self) -> Option<PhysicalPosition<f64>> {
        self.data.cursor_position
    }

    /// Check if the window is draggable.
    pub fn is_draggable(&self) -> bool {
        self.data.config.draggable
    }

    /// Start dragging the window.
    pub fn drag(&self) {
        if let Err(e) = self.data.window.drag_window() {
            log::debug!("Window drag failed: {:?}", e);
        }
    }

    /// Render one frame with the app's draw calls.
    pub fn render<A: WriterApp>(&mut self, app: &A) -> Result<(), wgpu::SurfaceError> {
        match self.renderer {
            Some(ref mut renderer) => renderer.render_app(app),
            None => Ok(()),
        }
    }
}

impl Drop for WriterWindow {
    fn drop(&mut self) {
        // The renderer borrows the boxed window, release it first
        self.renderer = None;
    }
}

/// Events that can be emitted by the writer window
#[derive(Debug, Clone)]
pub enum WriterEvent {
    /// Window was focused or unfocused
    FocusChanged(bool),
    /// Window was resized
    Resized(u32, u32),
    /// Window was moved (x, y in screen coordinates)
    Moved(i32, i32),
    /// A key was pressed (repeats are filtered out)
    KeyPressed(KeyCode),
    /// Frame update (for animations)
    Update(f32), // delta time in seconds
}

/// GPU resources for app initialization
pub struct GpuResources<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub format: wgpu::TextureFormat,
}

/// Application trait for handling writer window events
pub trait WriterApp {
    /// Called once when GPU resources are available (for initializing renderers)
    fn init_gpu(&mut self, _gpu: GpuResources<'_>) {}

    /// Called each frame to update state (e.g., animations)
    /// delta is the time since the last frame in seconds
    fn update(&mut self, _delta: f32) {}

    /// Return true if the app wants to quit
    fn should_quit(&self) -> bool {
        false
    }

    /// Called when an event occurs
    fn on_event(&mut self, event: WriterEvent);

    /// Called before rendering to prepare GPU resources
    /// viewport is in physical pixels, scale_factor is the display's DPI scale
    fn prepare(
        &mut self,
        _device: &wgpu::Device,
        _queue: &wgpu::Queue,
        _viewport: [f32; 2],
        _scale_factor: f32,
    ) {
    }

    /// Record draw calls into the frame's render pass
    fn render<'a>(&'a self, _render_pass: &mut wgpu::RenderPass<'a>) {}
}

/// Run the writer window event loop with custom event handling.
///
/// This takes ownership of the WriterWindow and runs until the window is closed.
pub fn run_with_app<A: WriterApp + 'static>(
    mut writer_window: WriterWindow,
    event_loop: EventLoop<()>,
    mut app: A,
) {
    let mut last_frame = Instant::now();
    let mut gpu_initialized = false;

    event_loop.run(move |event, _, control_flow| {
        // Always use Poll for continuous animation
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent {
                event: WindowEvent::Focused(focused),
                ..
            } => {
                writer_window.handle_focus(focused);
                app.on_event(WriterEvent::FocusChanged(focused));
                writer_window.request_redraw();
            }

            Event::WindowEvent {
                event: WindowEvent::CursorMoved { position, .. },
                ..
            } => {
                writer_window.handle_cursor_moved(position);
            }

            Event::WindowEvent {
                event: WindowEvent::CursorLeft { .. },
                ..
            } => {
                writer_window.handle_cursor_left();
            }

            Event::WindowEvent {
                event:
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    },
                ..
            } => {
                if writer_window.cursor_position().is_some() && writer_window.is_draggable() {
                    writer_window.drag();
                }
            }

            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    app.on_event(WriterEvent::KeyPressed(event.physical_key));
                }
            }

            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => {
                writer_window.handle_resize(size.width, size.height);
                app.on_event(WriterEvent::Resized(size.width, size.height));
            }

            Event::WindowEvent {
                event: WindowEvent::Moved(position),
                ..
            } => {
                app.on_event(WriterEvent::Moved(position.x, position.y));
            }

            Event::MainEventsCleared => {
                let now = Instant::now();
                let delta = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                app.update(delta);
                app.on_event(WriterEvent::Update(delta));

                if app.should_quit() {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                writer_window.request_redraw();
            }

            Event::RedrawRequested(_) => {
                if !gpu_initialized {
                    if let Some(ref renderer) = writer_window.renderer {
                        app.init_gpu(GpuResources {
                            device: renderer.device(),
                            queue: renderer.queue(),
                            format: renderer.format(),
                        });
                        gpu_initialized = true;
                    }
                }

                let (width, height) = writer_window.size();
                let viewport = [width as f32, height as f32];
                let scale_factor = writer_window.scale_factor();
                if let Some(ref renderer) = writer_window.renderer {
                    app.prepare(renderer.device(), renderer.queue(), viewport, scale_factor);
                }

                if let Err(e) = writer_window.render(&app) {
                    log::error!("Render error: {:?}", e);
                    match e {
                        wgpu::SurfaceError::Lost => {
                            let size = writer_window.window().inner_size();
                            writer_window.handle_resize(size.width, size.height);
                        }
                        wgpu::SurfaceError::OutOfMemory => {
                            *control_flow = ControlFlow::Exit;
                        }
                        _ => {}
                    }
                }
            }

            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
            }

            _ => (),
        }
    });
}
