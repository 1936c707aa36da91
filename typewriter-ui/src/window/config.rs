//! Window configuration types

/// Maximum texture size supported by most GPUs.
/// We use a conservative limit to ensure compatibility.
pub(super) const MAX_TEXTURE_SIZE: u32 = 2048;

/// Clamp dimensions to fit within max texture size while maintaining aspect ratio.
pub(super) fn clamp_to_max_size(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    if width <= max_size && height <= max_size {
        return (width, height);
    }

    let aspect_ratio = width as f32 / height as f32;

    if width > height {
        let new_width = max_size;
        let new_height = (new_width as f32 / aspect_ratio).round() as u32;
        (new_width, new_height.min(max_size))
    } else {
        let new_height = max_size;
        let new_width = (new_height as f32 * aspect_ratio).round() as u32;
        (new_width.min(max_size), new_height)
    }
}

/// Configuration for creating a writer window.
#[derive(Clone, Debug)]
pub struct WindowConfig {
    /// Width of the window in logical pixels.
    pub width: u32,
    /// Height of the window in logical pixels.
    pub height: u32,
    /// Whether the window should always stay on top.
    pub always_on_top: bool,
    /// Whether the window has no title bar or border.
    pub borderless: bool,
    /// Whether the window can be dragged by clicking anywhere.
    pub draggable: bool,
    /// Window title.
    pub title: String,
    /// Clear color [r, g, b, a]; alpha < 1 needs a transparent window.
    pub background: [f32; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 120,
            always_on_top: false,
            borderless: true,
            draggable: true,
            title: "Typewriter".to_string(),
            background: [0.08, 0.08, 0.1, 0.9],
        }
    }
}

impl WindowConfig {
    /// Whether the background needs a transparent surface
    pub fn is_transparent(&self) -> bool {
        self.background[3] < 1.0
    }
}
