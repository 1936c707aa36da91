//! wgpu-based renderer for typewriter windows

mod cursor;
mod text;

pub use cursor::CursorRenderer;
pub use text::TextWritingRenderer;

use tao::window::Window;
use thiserror::Error;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, TextureFormat};

#[derive(Error, Debug)]
pub enum RendererError {
    #[error("Failed to create wgpu adapter")]
    AdapterCreationFailed,
    #[error("Failed to request wgpu device: {0}")]
    DeviceRequestFailed(#[from] wgpu::RequestDeviceError),
    #[error("Failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),
    #[error("Unsupported window handle: {0}")]
    UnsupportedHandle(&'static str),
}

pub struct Renderer<'window> {
    device: Device,
    queue: Queue,
    surface: Surface<'window>,
    config: SurfaceConfiguration,
    clear_color: wgpu::Color,
}

impl<'window> Renderer<'window> {
    /// Create a new renderer for the given tao window.
    pub fn new(
        window: &'window Window,
        width: u32,
        height: u32,
        background: [f32; 4],
    ) -> Result<Self, RendererError> {
        use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // tao hands out raw-window-handle 0.5, wgpu 0.19 wants 0.6
        let window_handle = convert_window_handle(window.raw_window_handle())?;
        let display_handle = convert_display_handle(window.raw_display_handle())?;

        let surface = unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: display_handle,
                raw_window_handle: window_handle,
            })
        }?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RendererError::AdapterCreationFailed)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("typewriter device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            },
            None,
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(RendererError::AdapterCreationFailed)?;

        // Prefer an alpha mode that keeps the window background transparent
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|mode| surface_caps.alpha_modes.contains(mode))
        .or_else(|| surface_caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        log::info!(
            "Renderer ready: {:?} {}x{} ({:?})",
            surface_format,
            config.width,
            config.height,
            alpha_mode
        );

        let [r, g, b, a] = background.map(f64::from);
        Ok(Self {
            device,
            queue,
            surface,
            config,
            // Premultiplied clear color
            clear_color: wgpu::Color { r: r * a, g: g * a, b: b * a, a },
        })
    }

    /// Get a reference to the device.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get a reference to the queue.
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Get the surface texture format.
    pub fn format(&self) -> TextureFormat {
        self.config.format
    }

    /// Resize the renderer surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Clear the frame and let the app record its draw calls.
    pub fn render_app<A: crate::WriterApp>(&mut self, app: &A) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            app.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

// tao uses raw-window-handle 0.5 and wgpu 0.19 uses 0.6

fn convert_window_handle(
    handle: raw_window_handle::RawWindowHandle,
) -> Result<wgpu::rwh::RawWindowHandle, RendererError> {
    use raw_window_handle::RawWindowHandle as Rwh05;
    use wgpu::rwh::RawWindowHandle as Rwh06;

    match handle {
        #[cfg(target_os = "macos")]
        Rwh05::AppKit(h) => {
            let ns_view = std::ptr::NonNull::new(h.ns_view)
                .ok_or(RendererError::UnsupportedHandle("null NSView"))?;
            Ok(Rwh06::AppKit(wgpu::rwh::AppKitWindowHandle::new(ns_view)))
        }
        #[cfg(target_os = "windows")]
        Rwh05::Win32(h) => {
            use std::num::NonZeroIsize;
            let hwnd = NonZeroIsize::new(h.hwnd as isize)
                .ok_or(RendererError::UnsupportedHandle("null HWND"))?;
            let mut new_handle = wgpu::rwh::Win32WindowHandle::new(hwnd);
            new_handle.hinstance = NonZeroIsize::new(h.hinstance as isize);
            Ok(Rwh06::Win32(new_handle))
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        Rwh05::Xlib(h) => {
            let mut new_handle = wgpu::rwh::XlibWindowHandle::new(h.window);
            new_handle.visual_id = h.visual_id;
            Ok(Rwh06::Xlib(new_handle))
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        Rwh05::Xcb(h) => {
            use std::num::NonZeroU32;
            let window = NonZeroU32::new(h.window)
                .ok_or(RendererError::UnsupportedHandle("null xcb window"))?;
            let mut new_handle = wgpu::rwh::XcbWindowHandle::new(window);
            new_handle.visual_id = NonZeroU32::new(h.visual_id);
            Ok(Rwh06::Xcb(new_handle))
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        Rwh05::Wayland(h) => {
            let surface = std::ptr::NonNull::new(h.surface)
                .ok_or(RendererError::UnsupportedHandle("null wayland surface"))?;
            Ok(Rwh06::Wayland(wgpu::rwh::WaylandWindowHandle::new(surface)))
        }
        _ => Err(RendererError::UnsupportedHandle("window")),
    }
}

fn convert_display_handle(
    handle: raw_window_handle::RawDisplayHandle,
) -> Result<wgpu::rwh::RawDisplayHandle, RendererError> {
    use raw_window_handle::RawDisplayHandle as Rdh05;
    use wgpu::rwh::RawDisplayHandle as Rdh06;

    match handle {
        #[cfg(target_os = "macos")]
        Rdh05::AppKit(_) => Ok(Rdh06::AppKit(wgpu::rwh::AppKitDisplayHandle::new())),
        #[cfg(target_os = "windows")]
        Rdh05::Windows(_) => Ok(Rdh06::Windows(wgpu::rwh::WindowsDisplayHandle::new())),
        #[cfg(all(unix, not(target_os = "macos")))]
        Rdh05::Xlib(h) => Ok(Rdh06::Xlib(wgpu::rwh::XlibDisplayHandle::new(
            std::ptr::NonNull::new(h.display),
            h.screen,
        ))),
        #[cfg(all(unix, not(target_os = "macos")))]
        Rdh05::Xcb(h) => Ok(Rdh06::Xcb(wgpu::rwh::XcbDisplayHandle::new(
            std::ptr::NonNull::new(h.connection),
            h.screen,
        ))),
        #[cfg(all(unix, not(target_os = "macos")))]
        Rdh05::Wayland(h) => {
            let display = std::ptr::NonNull::new(h.display)
                .ok_or(RendererError::UnsupportedHandle("null wayland display"))?;
            Ok(Rdh06::Wayland(wgpu::rwh::WaylandDisplayHandle::new(display)))
        }
        _ => Err(RendererError::UnsupportedHandle("display")),
    }
}
