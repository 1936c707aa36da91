//! Typewriter text with a blinking cursor
//!
//! Reveals a string one character at a time inside a spring-animated
//! wrapper, while a cursor follows the measured width of what has been
//! revealed so far.
//!
//! Widths are not known until the renderer has shaped each character, so the
//! host feeds them back with [`TextWriting::set_char_width`] after every
//! prepare. A character that completes before its width is known does not
//! move the cursor.

pub mod cursor;
pub mod sequencer;
pub mod types;

use crate::animation::{AnimationControls, ControlCommand, SpringTransition, Variant};

pub use cursor::CursorTracker;
pub use sequencer::{CharacterCell, PassState, RevealSequencer, RevealStatus};
pub use types::{
    CursorView, RevealEvent, SpanView, TextWritingStyle, WritingFrame, BLINK_PERIOD,
    DEFAULT_STAGGER,
};

/// The typewriter widget
#[derive(Debug, Clone)]
pub struct TextWriting {
    text: String,
    sequencer: RevealSequencer,
    cursor: CursorTracker,
    /// External animation state (None = play immediately)
    controls: Option<AnimationControls>,
    /// Last controls revision applied
    seen_revision: u64,
    /// Skip rendering the cursor entirely
    nocursor: bool,
    /// Hide the cursor once the sequence completes
    noblink: bool,
    position: [f32; 2],
    style: TextWritingStyle,
}

impl TextWriting {
    /// Create a widget that starts revealing `text` after `delay` seconds
    pub fn new(text: impl Into<String>, delay: f32) -> Self {
        let text = text.into();
        let mut sequencer =
            RevealSequencer::new(&text, delay, DEFAULT_STAGGER, SpringTransition::default());
        sequencer.begin();

        Self {
            text,
            sequencer,
            cursor: CursorTracker::new(),
            controls: None,
            seen_revision: 0,
            nocursor: false,
            noblink: false,
            position: [0.0, 0.0],
            style: TextWritingStyle::default(),
        }
    }

    /// Drive the animation from an external controls handle.
    ///
    /// The widget adopts the handle's current variant and then follows
    /// commands issued after this call.
    pub fn with_controls(mut self, controls: AnimationControls) -> Self {
        self.seen_revision = controls.revision();
        self.cursor.reset();
        let variant = controls.current();
        self.controls = Some(controls);
        match variant {
            Variant::Visible => self.begin_pass(),
            Variant::Hidden => self.sequencer.hide(),
        }
        self
    }

    /// Never render the cursor
    pub fn with_nocursor(mut self, nocursor: bool) -> Self {
        self.nocursor = nocursor;
        self
    }

    /// Hide the cursor once every character has been revealed
    pub fn with_noblink(mut self, noblink: bool) -> Self {
        self.noblink = noblink;
        self
    }

    /// Seconds between consecutive characters
    pub fn with_stagger(self, stagger: f32) -> Self {
        let spring = self.sequencer.spring();
        self.with_timing(stagger, spring)
    }

    /// Spring used for the wrapper fade-in
    pub fn with_spring(self, spring: SpringTransition) -> Self {
        let stagger = self.sequencer.stagger();
        self.with_timing(stagger, spring)
    }

    /// Set both stagger and spring at once. Restarts the current pass.
    pub fn with_timing(mut self, stagger: f32, spring: SpringTransition) -> Self {
        let visible = self.sequencer.state() != PassState::Idle;
        self.sequencer.set_timing(stagger, spring);
        self.cursor.reset();
        if visible {
            self.begin_pass();
        }
        self
    }

    /// Top-left of the container in logical pixels
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    pub fn with_style(mut self, style: TextWritingStyle) -> Self {
        self.style = style;
        self
    }

    /// Whether the external state (if any) asks for the text to be shown
    fn wants_visible(&self) -> bool {
        self.controls
            .as_ref()
            .map(|controls| controls.current() == Variant::Visible)
            .unwrap_or(true)
    }

    /// Replace the text. Does nothing if the text is unchanged.
    ///
    /// All per-character state is discarded; a new pass starts if the widget
    /// is meant to be visible.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }

        log::debug!("text_writing: text changed ({} chars)", text.chars().count());
        self.sequencer.set_text(&text);
        self.text = text;
        self.cursor.reset();

        if self.wants_visible() {
            self.begin_pass();
        }
    }

    /// Begin a pass, frozen if the controls are stopped
    fn begin_pass(&mut self) {
        self.sequencer.begin();
        if self.controls.as_ref().is_some_and(AnimationControls::is_stopped) {
            self.sequencer.pause();
        }
    }

    /// Start the reveal over from the first character
    pub fn replay(&mut self) {
        self.cursor.reset();
        self.sequencer.begin();
    }

    /// Record the measured width of character `index`
    pub fn set_char_width(&mut self, index: usize, width: f32) {
        self.sequencer.set_width(index, width);
    }

    /// Record several measured widths
    pub fn set_char_widths(&mut self, widths: impl IntoIterator<Item = (usize, f32)>) {
        for (index, width) in widths {
            self.set_char_width(index, width);
        }
    }

    /// Advance by `delta` seconds.
    ///
    /// Applies pending control commands, then returns the completions that
    /// happened during this step (already applied to the cursor).
    pub fn update(&mut self, delta: f32) -> Vec<RevealEvent> {
        let mut events = self.apply_controls();
        events.extend(self.sequencer.update(delta));

        for event in &events {
            self.handle_event(*event);
        }

        self.cursor.update(delta);
        events
    }

    fn apply_controls(&mut self) -> Vec<RevealEvent> {
        let Some(controls) = &self.controls else {
            return Vec::new();
        };

        let mut events = Vec::new();
        for (revision, command) in controls.commands_since(self.seen_revision) {
            self.seen_revision = revision;
            log::trace!("text_writing: applying {:?}", command);
            match command {
                ControlCommand::Start(Variant::Visible) => match self.sequencer.state() {
                    PassState::Idle => {
                        self.cursor.reset();
                        self.sequencer.begin();
                    }
                    PassState::Paused => self.sequencer.resume(),
                    PassState::Running | PassState::Complete => {}
                },
                ControlCommand::Set(Variant::Visible) => {
                    if self.sequencer.state() == PassState::Idle {
                        self.cursor.reset();
                    }
                    // Handled in update() along with the sequencer's own events
                    events.extend(self.sequencer.finish());
                }
                ControlCommand::Start(Variant::Hidden) | ControlCommand::Set(Variant::Hidden) => {
                    self.sequencer.hide();
                    self.cursor.reset();
                }
                ControlCommand::Stop => self.sequencer.pause(),
            }
        }
        events
    }

    /// Apply one completion to the cursor.
    ///
    /// Events from an earlier pass, or for a character whose width has not
    /// been measured, are dropped.
    pub fn handle_event(&mut self, event: RevealEvent) {
        if event.generation() != self.sequencer.generation() {
            log::trace!(
                "text_writing: dropping stale event from pass {} (current {})",
                event.generation(),
                self.sequencer.generation()
            );
            return;
        }

        match event {
            RevealEvent::CharacterRevealed { index, .. } => {
                let Some(width) = self.sequencer.cell(index).and_then(CharacterCell::width) else {
                    log::trace!("text_writing: no measurement for char {}, cursor not moved", index);
                    return;
                };
                self.cursor.advance(width, !self.nocursor);
                log::trace!(
                    "text_writing: char {} revealed, cursor at {}px",
                    index,
                    self.cursor.offset()
                );
            }
            RevealEvent::SequenceComplete { .. } => {
                self.cursor.finish(self.noblink);
                log::debug!(
                    "text_writing: sequence complete, cursor at {}px{}",
                    self.cursor.offset(),
                    if self.noblink { " (hidden)" } else { "" }
                );
            }
        }
    }

    /// Snapshot of what should be drawn this frame
    pub fn frame(&self) -> WritingFrame {
        let mut x = 0.0;
        let spans = self
            .sequencer
            .cells()
            .iter()
            .map(|cell| {
                let span = SpanView {
                    ch: cell.ch(),
                    index: cell.index(),
                    x,
                    opacity: if cell.is_revealed() { 1.0 } else { 0.0 },
                };
                x += cell.width().unwrap_or(0.0);
                span
            })
            .collect();

        let cursor = (!self.nocursor).then(|| CursorView {
            left: self.cursor.offset(),
            opacity: self.cursor.opacity(),
            blinking: self.cursor.is_blinking(),
        });

        WritingFrame {
            origin: self.position,
            container_opacity: self.sequencer.wrapper_opacity(),
            spans,
            cursor,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sequencer(&self) -> &RevealSequencer {
        &self.sequencer
    }

    pub fn cursor(&self) -> &CursorTracker {
        &self.cursor
    }

    /// Cursor offset in pixels
    pub fn cursor_offset(&self) -> f32 {
        self.cursor.offset()
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// Whether anything is still moving (reveal, wrapper spring or blink)
    pub fn is_animating(&self) -> bool {
        matches!(self.sequencer.state(), PassState::Running)
            || !self.sequencer.is_wrapper_settled()
            || self.cursor.is_blinking()
    }

    pub fn controls(&self) -> Option<&AnimationControls> {
        self.controls.as_ref()
    }

    pub fn nocursor(&self) -> bool {
        self.nocursor
    }

    pub fn noblink(&self) -> bool {
        self.noblink
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = [x, y];
    }

    pub fn style(&self) -> &TextWritingStyle {
        &self.style
    }
}
