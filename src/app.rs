//! Application state - wires the typewriter widget to the window

use typewriter_ui::{
    AnimationControls, CursorRenderer, GpuResources, KeyCode, TextWriting, TextWritingRenderer,
    Variant, WriterApp, WriterEvent,
};

use crate::config::Config;

/// Main application state
pub struct App {
    writing: TextWriting,
    controls: AnimationControls,
    // GPU renderers (initialized lazily)
    text_renderer: Option<TextWritingRenderer>,
    cursor_renderer: Option<CursorRenderer>,
    /// Set once the renderer has measured the text at least once
    layout_ready: bool,
    quit: bool,
}

impl App {
    /// Create new app from configuration
    pub fn new(config: &Config) -> Self {
        let controls = AnimationControls::new();
        if config.writing.autoplay {
            controls.start(Variant::Visible);
        }

        let padding = config.window.padding;
        let writing = TextWriting::new(config.writing.text.as_str(), config.writing.delay)
            .with_timing(config.writing.stagger, config.spring_transition())
            .with_nocursor(config.writing.nocursor)
            .with_noblink(config.writing.noblink)
            .with_position(padding, padding)
            .with_style(config.text_style())
            .with_controls(controls.clone());

        Self {
            writing,
            controls,
            text_renderer: None,
            cursor_renderer: None,
            layout_ready: false,
            quit: false,
        }
    }

    /// Keyboard shortcuts
    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyR => {
                log::info!("Replaying");
                self.writing.replay();
                if self.controls.current() == Variant::Hidden || self.controls.is_stopped() {
                    self.controls.start(Variant::Visible);
                }
            }
            KeyCode::Space => {
                if self.controls.is_stopped() || self.controls.current() == Variant::Hidden {
                    log::info!("Starting");
                    self.controls.start(Variant::Visible);
                } else {
                    log::info!("Stopping");
                    self.controls.stop();
                }
            }
            KeyCode::KeyH => {
                log::info!("Hiding");
                self.controls.start(Variant::Hidden);
            }
            KeyCode::KeyS => {
                log::info!("Skipping to the end");
                self.controls.set(Variant::Visible);
            }
            KeyCode::Escape => self.quit = true,
            _ => {}
        }
    }
}

impl WriterApp for App {
    fn init_gpu(&mut self, gpu: GpuResources<'_>) {
        self.text_renderer = Some(TextWritingRenderer::new(gpu.device, gpu.queue, gpu.format));
        self.cursor_renderer = Some(CursorRenderer::new(gpu.device, gpu.format));
        log::info!("GPU renderers initialized");
    }

    fn update(&mut self, delta: f32) {
        // Hold the clock until widths are known so the cursor can follow
        // from the very first character
        if !self.layout_ready {
            return;
        }

        for event in self.writing.update(delta) {
            log::trace!("{:?}", event);
        }
    }

    fn should_quit(&self) -> bool {
        self.quit
    }

    fn on_event(&mut self, event: WriterEvent) {
        match event {
            WriterEvent::KeyPressed(key) => self.handle_key(key),
            WriterEvent::FocusChanged(focused) => log::debug!("Focus changed: {}", focused),
            WriterEvent::Resized(width, height) => log::debug!("Resized to {}x{}", width, height),
            WriterEvent::Moved(..) | WriterEvent::Update(_) => {}
        }
    }

    fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        viewport: [f32; 2],
        scale_factor: f32,
    ) {
        let frame = self.writing.frame();

        if let Some(ref mut text_renderer) = self.text_renderer {
            let widths = text_renderer.prepare(
                device,
                queue,
                &frame,
                self.writing.style(),
                viewport,
                scale_factor,
            );
            if !widths.is_empty() {
                log::debug!("Measured {} characters", widths.len());
                self.writing.set_char_widths(widths);
            }
            self.layout_ready = true;
        }

        if let Some(ref mut cursor_renderer) = self.cursor_renderer {
            cursor_renderer.prepare(queue, &frame, self.writing.style(), viewport, scale_factor);
        }
    }

    fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if let Some(ref text_renderer) = self.text_renderer {
            text_renderer.render(render_pass);
        }
        if let Some(ref cursor_renderer) = self.cursor_renderer {
            cursor_renderer.render(render_pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(toml: &str) -> App {
        let mut app = App::new(&Config::from_toml(toml).unwrap());
        // Stand in for the renderer's first measurement
        let widths: Vec<_> = (0..app.writing.text().chars().count()).map(|i| (i, 10.0)).collect();
        app.writing.set_char_widths(widths);
        app.layout_ready = true;
        app
    }

    fn run(app: &mut App, seconds: f32) {
        let steps = (seconds / 0.01).round() as usize;
        for _ in 0..steps {
            app.update(0.01);
        }
    }

    #[test]
    fn test_autoplay_writes_everything() {
        let mut app = app("[writing]\ntext = \"abc\"\n");
        run(&mut app, 2.0);
        assert!(app.writing.is_complete());
        assert_eq!(app.writing.frame().visible_text(), "abc");
        assert_eq!(app.writing.cursor_offset(), 30.0);
    }

    #[test]
    fn test_clock_held_until_layout() {
        let mut app = App::new(&Config::from_toml("[writing]\ntext = \"ab\"\n").unwrap());
        for _ in 0..100 {
            app.update(0.01);
        }
        assert_eq!(app.writing.frame().visible_text(), "");
    }

    #[test]
    fn test_without_autoplay_waits_for_space() {
        let mut app = app("[writing]\ntext = \"ab\"\nautoplay = false\n");
        run(&mut app, 1.0);
        assert_eq!(app.writing.frame().visible_text(), "");

        app.on_event(WriterEvent::KeyPressed(KeyCode::Space));
        run(&mut app, 1.0);
        assert_eq!(app.writing.frame().visible_text(), "ab");
    }

    #[test]
    fn test_space_toggles_stop() {
        let mut app = app("[writing]\ntext = \"abcdef\"\n");
        run(&mut app, 0.2);
        app.on_event(WriterEvent::KeyPressed(KeyCode::Space));
        assert!(app.controls.is_stopped());

        let shown = app.writing.frame().visible_text();
        run(&mut app, 1.0);
        assert_eq!(app.writing.frame().visible_text(), shown);

        app.on_event(WriterEvent::KeyPressed(KeyCode::Space));
        run(&mut app, 1.0);
        assert_eq!(app.writing.frame().visible_text(), "abcdef");
    }

    #[test]
    fn test_skip_and_hide() {
        let mut app = app("[writing]\ntext = \"abcdef\"\ndelay = 5.0\n");
        app.on_event(WriterEvent::KeyPressed(KeyCode::KeyS));
        app.update(0.01);
        assert!(app.writing.is_complete());
        assert_eq!(app.writing.cursor_offset(), 60.0);

        app.on_event(WriterEvent::KeyPressed(KeyCode::KeyH));
        app.update(0.01);
        assert_eq!(app.writing.frame().visible_text(), "");
        assert_eq!(app.writing.cursor_offset(), 0.0);
    }

    #[test]
    fn test_replay_restarts_from_zero() {
        let mut app = app("[writing]\ntext = \"ab\"\n");
        run(&mut app, 2.0);
        assert!(app.writing.is_complete());

        app.on_event(WriterEvent::KeyPressed(KeyCode::KeyR));
        assert_eq!(app.writing.cursor_offset(), 0.0);
        assert!(!app.writing.is_complete());
        run(&mut app, 1.0);
        assert_eq!(app.writing.cursor_offset(), 20.0);
    }

    #[test]
    fn test_escape_quits() {
        let mut app = app("");
        assert!(!app.should_quit());
        app.on_event(WriterEvent::KeyPressed(KeyCode::Escape));
        assert!(app.should_quit());
    }
}
