//! Elements system for typewriter-ui
//!
//! Widgets are plain state machines. Each produces a frame description that
//! the matching renderer turns into draw calls.

pub mod text_writing;

pub use text_writing::{TextWriting, TextWritingStyle, WritingFrame};
