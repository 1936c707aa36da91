//! Per-character text rendering for the typewriter widget
//!
//! Every character is shaped into its own glyphon buffer so it can be faded
//! independently, and so its advance width can be reported back to the
//! widget as the post-render measurement the cursor relies on.

use glyphon::{
    Attrs, Buffer as TextBuffer, Color, Family, FontSystem, Metrics, Resolution, Shaping,
    SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer as GlyphonTextRenderer,
};
use wgpu::{Device, MultisampleState, Queue, RenderPass, TextureFormat};

use crate::elements::text_writing::{TextWritingStyle, WritingFrame};

fn shape_char(font_system: &mut FontSystem, ch: char, font_size: f32) -> TextBuffer {
    let line_height = font_size * 1.2;
    let mut buffer = TextBuffer::new(font_system, Metrics::new(font_size, line_height));
    // Wide enough that a single glyph never wraps
    buffer.set_size(font_system, f32::MAX, line_height);
    let mut utf8 = [0u8; 4];
    buffer.set_text(
        font_system,
        ch.encode_utf8(&mut utf8),
        Attrs::new().family(Family::SansSerif),
        Shaping::Advanced,
    );
    buffer
}

/// Sum of glyph advances (whitespace included, unlike `line_w` trimming)
fn buffer_width(buffer: &TextBuffer) -> f32 {
    buffer
        .layout_runs()
        .map(|run| run.glyphs.iter().map(|glyph| glyph.w).sum::<f32>())
        .fold(0.0, f32::max)
}

/// One shaped character
struct ShapedChar {
    ch: char,
    buffer: TextBuffer,
    width: f32,
}

/// Renders the spans of a [`WritingFrame`] with glyphon
pub struct TextWritingRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    atlas: TextAtlas,
    renderer: GlyphonTextRenderer,
    shaped: Vec<ShapedChar>,
    shaped_font_size: f32,
}

impl TextWritingRenderer {
    /// Create a new text renderer
    pub fn new(device: &Device, queue: &Queue, format: TextureFormat) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let mut atlas = TextAtlas::new(device, queue, format);
        let renderer =
            GlyphonTextRenderer::new(&mut atlas, device, MultisampleState::default(), None);

        Self {
            font_system,
            swash_cache,
            atlas,
            renderer,
            shaped: Vec::new(),
            shaped_font_size: 0.0,
        }
    }

    /// Reshape if the frame's characters or the font size changed.
    ///
    /// Returns `(index, width)` for every character when reshaped, otherwise
    /// an empty Vec.
    fn reshape(&mut self, frame: &WritingFrame, style: &TextWritingStyle) -> Vec<(usize, f32)> {
        let unchanged = self.shaped_font_size == style.font_size
            && self.shaped.len() == frame.spans.len()
            && self
                .shaped
                .iter()
                .zip(&frame.spans)
                .all(|(shaped, span)| shaped.ch == span.ch);
        if unchanged {
            return Vec::new();
        }

        self.shaped = frame
            .spans
            .iter()
            .map(|span| {
                let buffer = shape_char(&mut self.font_system, span.ch, style.font_size);
                let width = buffer_width(&buffer);
                ShapedChar { ch: span.ch, buffer, width }
            })
            .collect();
        self.shaped_font_size = style.font_size;

        log::debug!("Shaped {} characters at {}px", self.shaped.len(), style.font_size);

        self.shaped
            .iter()
            .enumerate()
            .map(|(index, shaped)| (index, shaped.width))
            .collect()
    }

    /// Prepare the frame's spans for rendering.
    ///
    /// Returns freshly measured `(index, width)` pairs which the caller should
    /// hand back to the widget via `set_char_widths()`.
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        frame: &WritingFrame,
        style: &TextWritingStyle,
        viewport: [f32; 2],
        scale_factor: f32,
    ) -> Vec<(usize, f32)> {
        let measured = self.reshape(frame, style);

        let line_height = style.line_height();
        let [r, g, b, a] = style.text_color;

        // Lay spans out with this renderer's own measurements so glyphs sit
        // correctly even before the widget has received them
        let mut x = frame.origin[0];
        let mut text_areas = Vec::with_capacity(self.shaped.len());
        for (shaped, span) in self.shaped.iter().zip(&frame.spans) {
            let left = x;
            x += shaped.width;

            let alpha = a * span.opacity * frame.container_opacity;
            if alpha <= 0.0 {
                continue;
            }

            text_areas.push(TextArea {
                buffer: &shaped.buffer,
                left: left * scale_factor,
                top: frame.origin[1] * scale_factor,
                scale: scale_factor,
                bounds: TextBounds {
                    left: 0,
                    top: 0,
                    right: viewport[0] as i32,
                    bottom: viewport[1] as i32,
                },
                default_color: Color::rgba(
                    (r * 255.0) as u8,
                    (g * 255.0) as u8,
                    (b * 255.0) as u8,
                    (alpha.clamp(0.0, 1.0) * 255.0) as u8,
                ),
            });
        }

        log::trace!(
            "Prepared {} of {} spans, line height {}",
            text_areas.len(),
            frame.spans.len(),
            line_height
        );

        if let Err(e) = self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            Resolution {
                width: viewport[0] as u32,
                height: viewport[1] as u32,
            },
            text_areas,
            &mut self.swash_cache,
        ) {
            log::error!("Failed to prepare typewriter text: {:?}", e);
        }

        measured
    }

    /// Render the prepared spans
    pub fn render<'a>(&'a self, render_pass: &mut RenderPass<'a>) {
        if let Err(e) = self.renderer.render(&self.atlas, render_pass) {
            log::error!("Failed to render typewriter text: {:?}", e);
        }
    }

    /// Trim the text atlas to free unused memory
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}
