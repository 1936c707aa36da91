//! Core types for the typewriter widget

/// Delay between consecutive characters starting to reveal, in seconds
pub const DEFAULT_STAGGER: f32 = 0.15;

/// Period of one cursor blink cycle, in seconds
pub const BLINK_PERIOD: f32 = 1.0;

/// Visual style for the typewriter text and cursor
#[derive(Debug, Clone, PartialEq)]
pub struct TextWritingStyle {
    /// Font size in pixels
    pub font_size: f32,
    /// Text color [r, g, b, a]
    pub text_color: [f32; 4],
    /// Cursor color [r, g, b, a]
    pub cursor_color: [f32; 4],
    /// Cursor bar width in pixels
    pub cursor_width: f32,
    /// Cursor bar height in pixels (None = line height)
    pub cursor_height: Option<f32>,
}

impl Default for TextWritingStyle {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            text_color: [1.0, 1.0, 1.0, 1.0],
            cursor_color: [1.0, 1.0, 1.0, 1.0],
            cursor_width: 2.0,
            cursor_height: None,
        }
    }
}

impl TextWritingStyle {
    pub fn line_height(&self) -> f32 {
        self.font_size * 1.2
    }

    /// Effective cursor size [width, height]
    pub fn cursor_size(&self) -> [f32; 2] {
        [
            self.cursor_width,
            self.cursor_height.unwrap_or_else(|| self.line_height()),
        ]
    }
}

/// Completion notification produced by the reveal sequence.
///
/// `generation` identifies the reveal pass the event belongs to; events from
/// an earlier pass are ignored by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// The character at `index` finished its reveal transition
    CharacterRevealed { generation: u64, index: usize },
    /// Every character of the pass has been revealed
    SequenceComplete { generation: u64 },
}

impl RevealEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::CharacterRevealed { generation, .. } | Self::SequenceComplete { generation } => {
                *generation
            }
        }
    }
}

/// One inline character element
#[derive(Debug, Clone, PartialEq)]
pub struct SpanView {
    pub ch: char,
    pub index: usize,
    /// Left edge relative to the container, from measured widths
    pub x: f32,
    pub opacity: f32,
}

/// The absolutely positioned cursor element
#[derive(Debug, Clone, PartialEq)]
pub struct CursorView {
    /// Left offset in pixels relative to the container
    pub left: f32,
    pub opacity: f32,
    pub blinking: bool,
}

/// Everything needed to draw the widget for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct WritingFrame {
    /// Top-left of the container in logical pixels
    pub origin: [f32; 2],
    /// Opacity of the wrapper gating all spans
    pub container_opacity: f32,
    pub spans: Vec<SpanView>,
    /// None when the cursor is suppressed
    pub cursor: Option<CursorView>,
}

impl WritingFrame {
    /// Spans that are currently drawn with non-zero opacity
    pub fn visible_spans(&self) -> impl Iterator<Item = &SpanView> {
        self.spans.iter().filter(|span| span.opacity > 0.0)
    }

    /// The revealed text as a string
    pub fn visible_text(&self) -> String {
        self.visible_spans().map(|span| span.ch).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_height_defaults_to_line_height() {
        let style = TextWritingStyle {
            font_size: 20.0,
            ..Default::default()
        };
        assert_eq!(style.cursor_size(), [2.0, 24.0]);

        let style = TextWritingStyle {
            cursor_height: Some(10.0),
            ..style
        };
        assert_eq!(style.cursor_size(), [2.0, 10.0]);
    }

    #[test]
    fn test_visible_text() {
        let frame = WritingFrame {
            origin: [0.0, 0.0],
            container_opacity: 1.0,
            spans: vec![
                SpanView { ch: 'H', index: 0, x: 0.0, opacity: 1.0 },
                SpanView { ch: 'i', index: 1, x: 10.0, opacity: 0.0 },
            ],
            cursor: None,
        };
        assert_eq!(frame.visible_text(), "H");
    }
}
