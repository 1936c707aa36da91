//! # typewriter-ui
//!
//! An animated "typewriter" text widget rendered with wgpu.
//!
//! ## Features
//! - Staggered per-character reveal inside a spring-animated wrapper
//! - A cursor that follows the measured width of the revealed text
//! - Blinking cursor, optionally hidden once writing completes
//! - External start/stop/set controls shared between widgets
//! - Transparent, borderless, draggable host window
//!
//! ## Example
//!
//! ```no_run
//! use typewriter_ui::{EventLoop, TextWriting, WindowConfig, WriterWindow};
//!
//! fn main() {
//!     let event_loop = EventLoop::new();
//!
//!     let writing = TextWriting::new("Hello, world", 0.5).with_noblink(true);
//!
//!     let window = WriterWindow::new(&event_loop, WindowConfig::default())
//!         .expect("Failed to create window");
//!
//!     // Implement WriterApp around `writing`, then:
//!     // typewriter_ui::run_with_app(window, event_loop, app);
//!     # let _ = (window, writing);
//! }
//! ```

pub mod animation;
pub mod elements;
mod renderer;
mod window;

// Animation
pub use animation::{AnimationControls, ControlCommand, Spring, SpringTransition, Variant};

// Elements
pub use elements::text_writing::{
    CursorTracker, CursorView, RevealEvent, RevealSequencer, SpanView, TextWriting,
    TextWritingStyle, WritingFrame,
};

// Renderer
pub use renderer::{CursorRenderer, Renderer, RendererError, TextWritingRenderer};

// Window
pub use window::{
    run_with_app, GpuResources, WindowConfig, WindowError, WriterApp, WriterEvent, WriterWindow,
};

// Re-export commonly used types
pub use tao::event_loop::EventLoop;
pub use tao::keyboard::KeyCode;
