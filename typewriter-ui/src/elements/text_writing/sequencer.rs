//! Character-by-character reveal scheduling

use crate::animation::{Spring, SpringTransition};

use super::types::RevealEvent;

/// Reveal status of one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStatus {
    Hidden,
    Revealed,
}

/// One character of the input text
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterCell {
    ch: char,
    index: usize,
    width: Option<f32>,
    status: RevealStatus,
}

impl CharacterCell {
    fn new(index: usize, ch: char) -> Self {
        Self {
            ch,
            index,
            width: None,
            status: RevealStatus::Hidden,
        }
    }

    pub fn ch(&self) -> char {
        self.ch
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Rendered width in pixels, once measured
    pub fn width(&self) -> Option<f32> {
        self.width
    }

    pub fn status(&self) -> RevealStatus {
        self.status
    }

    pub fn is_revealed(&self) -> bool {
        self.status == RevealStatus::Revealed
    }
}

/// Lifecycle of a reveal pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// Hidden, waiting to be started
    Idle,
    Running,
    /// Time frozen mid-pass
    Paused,
    Complete,
}

/// Schedules the staggered reveal of a text's characters.
///
/// Character `i` reveals `delay + i * stagger` seconds after the pass starts,
/// with a zero-duration transition. The wrapper fades in on a spring from the
/// start of the pass; the sequence completes once every character is revealed
/// and the wrapper spring has come to rest.
#[derive(Debug, Clone)]
pub struct RevealSequencer {
    cells: Vec<CharacterCell>,
    delay: f32,
    stagger: f32,
    spring: SpringTransition,
    /// Wrapper opacity animation (None = hidden)
    wrapper: Option<Spring>,
    elapsed: f32,
    next_index: usize,
    state: PassState,
    generation: u64,
}

impl RevealSequencer {
    /// Create an idle sequencer for `text`
    pub fn new(text: &str, delay: f32, stagger: f32, spring: SpringTransition) -> Self {
        Self {
            cells: Self::build_cells(text),
            delay: sanitize_seconds(delay),
            stagger: sanitize_seconds(stagger),
            spring: sanitize_spring(spring),
            wrapper: None,
            elapsed: 0.0,
            next_index: 0,
            state: PassState::Idle,
            generation: 0,
        }
    }

    fn build_cells(text: &str) -> Vec<CharacterCell> {
        text.chars()
            .enumerate()
            .map(|(index, ch)| CharacterCell::new(index, ch))
            .collect()
    }

    /// Discard every cell (and its measurement) and rebuild from `text`.
    ///
    /// Leaves the sequencer idle; the caller decides when to begin.
    pub fn set_text(&mut self, text: &str) {
        self.cells = Self::build_cells(text);
        self.reset_pass();
        log::debug!("sequencer: rebuilt {} cells", self.cells.len());
    }

    /// Change stagger and spring. Leaves the sequencer idle in a new pass.
    pub fn set_timing(&mut self, stagger: f32, spring: SpringTransition) {
        self.stagger = sanitize_seconds(stagger);
        self.spring = sanitize_spring(spring);
        self.reset_pass();
    }

    fn reset_pass(&mut self) {
        self.generation += 1;
        self.elapsed = 0.0;
        self.next_index = 0;
        self.wrapper = None;
        self.state = PassState::Idle;
        for cell in &mut self.cells {
            cell.status = RevealStatus::Hidden;
        }
    }

    /// Start a new reveal pass from the beginning
    pub fn begin(&mut self) {
        self.reset_pass();
        self.wrapper = Some(Spring::new(self.spring, 0.0, 1.0));
        self.state = PassState::Running;
        log::debug!(
            "sequencer: pass {} started ({} cells, delay {}s)",
            self.generation,
            self.cells.len(),
            self.delay
        );
    }

    /// Return everything to the hidden state
    pub fn hide(&mut self) {
        self.reset_pass();
    }

    /// Freeze a running pass
    pub fn pause(&mut self) {
        if self.state == PassState::Running {
            self.state = PassState::Paused;
        }
    }

    /// Continue a paused pass
    pub fn resume(&mut self) {
        if self.state == PassState::Paused {
            self.state = PassState::Running;
        }
    }

    /// Seconds after pass start at which cell `index` reveals
    pub fn start_time(&self, index: usize) -> f32 {
        self.delay + index as f32 * self.stagger
    }

    /// Seconds after pass start at which the last character reveals.
    ///
    /// Completion also waits for the wrapper spring, so it may come later.
    pub fn completion_time(&self) -> f32 {
        match self.cells.len() {
            0 => self.delay,
            n => self.start_time(n - 1),
        }
    }

    /// Advance the pass by `delta` seconds, returning completions in order
    pub fn update(&mut self, delta: f32) -> Vec<RevealEvent> {
        let mut events = Vec::new();

        match self.state {
            PassState::Running => {}
            PassState::Idle | PassState::Paused | PassState::Complete => return events,
        }

        self.elapsed += delta.max(0.0);
        if let Some(wrapper) = &mut self.wrapper {
            wrapper.update(delta);
        }

        while self.next_index < self.cells.len() && self.elapsed >= self.start_time(self.next_index) {
            self.reveal_next(&mut events);
        }

        if self.next_index == self.cells.len()
            && self.elapsed >= self.completion_time()
            && self.is_wrapper_settled()
        {
            self.complete(&mut events);
        }

        events
    }

    /// Jump to the end of the pass, revealing every remaining cell.
    ///
    /// Starts a pass first when idle. Remaining completions are still
    /// reported in order.
    pub fn finish(&mut self) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        match self.state {
            PassState::Complete => return events,
            PassState::Idle => self.begin(),
            PassState::Running | PassState::Paused => {}
        }

        while self.next_index < self.cells.len() {
            self.reveal_next(&mut events);
        }
        self.elapsed = self.elapsed.max(self.completion_time());
        if let Some(wrapper) = &mut self.wrapper {
            wrapper.settle();
        }
        self.complete(&mut events);
        events
    }

    fn reveal_next(&mut self, events: &mut Vec<RevealEvent>) {
        let index = self.next_index;
        self.cells[index].status = RevealStatus::Revealed;
        self.next_index += 1;
        events.push(RevealEvent::CharacterRevealed {
            generation: self.generation,
            index,
        });
    }

    fn complete(&mut self, events: &mut Vec<RevealEvent>) {
        self.state = PassState::Complete;
        events.push(RevealEvent::SequenceComplete {
            generation: self.generation,
        });
        log::debug!("sequencer: pass {} complete", self.generation);
    }

    /// Record the rendered width of cell `index`; out-of-range indices are ignored
    pub fn set_width(&mut self, index: usize, width: f32) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.width = Some(width);
        }
    }

    pub fn cells(&self) -> &[CharacterCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&CharacterCell> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == PassState::Complete
    }

    /// Seconds since the current pass started (excluding paused time)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn stagger(&self) -> f32 {
        self.stagger
    }

    pub fn spring(&self) -> SpringTransition {
        self.spring
    }

    /// Wrapper opacity clamped to [0, 1]
    pub fn wrapper_opacity(&self) -> f32 {
        self.wrapper
            .as_ref()
            .map(|spring| spring.value().clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// Whether the wrapper spring has come to rest
    pub fn is_wrapper_settled(&self) -> bool {
        self.wrapper.as_ref().map(Spring::is_settled).unwrap_or(true)
    }

    /// Fraction of cells revealed (1.0 for empty text)
    pub fn progress(&self) -> f32 {
        if self.cells.is_empty() {
            1.0
        } else {
            self.next_index as f32 / self.cells.len() as f32
        }
    }
}

/// Negative or non-finite durations collapse to zero
fn sanitize_seconds(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

/// Non-positive or non-finite spring parameters fall back to the defaults.
///
/// Zero damping is replaced too: an undamped spring never comes to rest.
fn sanitize_spring(spring: SpringTransition) -> SpringTransition {
    let fallback = SpringTransition::default();
    let positive = |value: f32, default: f32| {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            default
        }
    };
    SpringTransition {
        damping: positive(spring.damping, fallback.damping),
        stiffness: positive(spring.stiffness, fallback.stiffness),
        mass: positive(spring.mass, fallback.mass),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer(text: &str, delay: f32) -> RevealSequencer {
        RevealSequencer::new(text, delay, 0.15, SpringTransition::default())
    }

    fn revealed_indices(events: &[RevealEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                RevealEvent::CharacterRevealed { index, .. } => Some(*index),
                RevealEvent::SequenceComplete { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_cells_follow_text() {
        let seq = sequencer("Héllo", 0.0);
        let chars: Vec<char> = seq.cells().iter().map(CharacterCell::ch).collect();
        assert_eq!(chars, vec!['H', 'é', 'l', 'l', 'o']);
        assert!(seq.cells().iter().all(|c| c.width().is_none() && !c.is_revealed()));
        assert_eq!(seq.cell(4).map(CharacterCell::index), Some(4));
    }

    #[test]
    fn test_idle_sequencer_does_nothing() {
        let mut seq = sequencer("abc", 0.0);
        assert_eq!(seq.state(), PassState::Idle);
        assert!(seq.update(10.0).is_empty());
        assert_eq!(seq.wrapper_opacity(), 0.0);
    }

    #[test]
    fn test_staggered_reveal() {
        let mut seq = sequencer("abc", 0.5);
        seq.begin();

        assert!(seq.update(0.4).is_empty());

        let events = seq.update(0.11); // 0.51
        assert_eq!(revealed_indices(&events), vec![0]);

        let events = seq.update(0.15); // 0.66
        assert_eq!(revealed_indices(&events), vec![1]);
        assert!(!seq.is_complete());

        let events = seq.update(0.15); // 0.81
        assert_eq!(events.len(), 1);
        assert_eq!(revealed_indices(&events), vec![2]);
        assert!(!seq.is_complete());

        // Wrapper spring comes to rest well before 1.81
        let events = seq.update(1.0);
        assert_eq!(events, vec![RevealEvent::SequenceComplete { generation: seq.generation() }]);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_large_step_reveals_in_order_then_completes() {
        let mut seq = sequencer("hello", 0.0);
        seq.begin();

        let events = seq.update(5.0);
        assert_eq!(revealed_indices(&events), vec![0, 1, 2, 3, 4]);
        assert_eq!(events.len(), 6);
        assert!(matches!(events[5], RevealEvent::SequenceComplete { .. }));

        // Completion fires once
        assert!(seq.update(5.0).is_empty());
    }

    #[test]
    fn test_empty_text_completes_with_wrapper() {
        let mut seq = sequencer("", 0.3);
        seq.begin();

        // Delay elapsed, wrapper still moving
        assert!(seq.update(0.4).is_empty());
        assert!(!seq.is_wrapper_settled());

        let events = seq.update(2.0);
        assert_eq!(events, vec![RevealEvent::SequenceComplete { generation: seq.generation() }]);
        assert_eq!(seq.progress(), 1.0);
    }

    #[test]
    fn test_empty_text_waits_for_long_delay() {
        let mut seq = sequencer("", 3.0);
        seq.begin();

        // Wrapper at rest, delay not yet elapsed
        assert!(seq.update(2.0).is_empty());
        assert!(seq.is_wrapper_settled());

        assert_eq!(seq.update(1.5).len(), 1);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut seq = sequencer("ab", 0.0);
        seq.begin();
        assert_eq!(revealed_indices(&seq.update(0.01)), vec![0]);

        seq.pause();
        assert_eq!(seq.state(), PassState::Paused);
        assert!(seq.update(10.0).is_empty());
        assert!((seq.elapsed() - 0.01).abs() < 1e-6);

        seq.resume();
        assert_eq!(revealed_indices(&seq.update(0.2)), vec![1]);
        assert!(!seq.is_complete());
        assert_eq!(seq.update(2.0).len(), 1);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_finish_reveals_remaining() {
        let mut seq = sequencer("abcd", 1.0);
        seq.begin();
        let _ = seq.update(1.01);

        let events = seq.finish();
        assert_eq!(revealed_indices(&events), vec![1, 2, 3]);
        assert!(seq.is_complete());
        assert!(seq.is_wrapper_settled());
        assert_eq!(seq.wrapper_opacity(), 1.0);
        assert!(seq.finish().is_empty());
    }

    #[test]
    fn test_finish_from_idle_begins_pass() {
        let mut seq = sequencer("ab", 0.0);
        let events = seq.finish();
        assert_eq!(revealed_indices(&events), vec![0, 1]);
        assert_eq!(seq.generation(), 1);
    }

    #[test]
    fn test_set_text_discards_measurements() {
        let mut seq = sequencer("ab", 0.0);
        seq.set_width(0, 8.0);
        seq.set_width(1, 9.0);
        seq.begin();
        let _ = seq.update(0.05);
        let before = seq.generation();

        seq.set_text("xyz");
        assert_eq!(seq.len(), 3);
        assert!(seq.cells().iter().all(|c| c.width().is_none() && !c.is_revealed()));
        assert_eq!(seq.state(), PassState::Idle);
        assert!(seq.generation() > before);
    }

    #[test]
    fn test_begin_bumps_generation_and_rehides() {
        let mut seq = sequencer("ab", 0.0);
        seq.begin();
        let _ = seq.update(1.0);
        let first = seq.generation();

        seq.begin();
        assert!(seq.generation() > first);
        assert!(seq.cells().iter().all(|c| !c.is_revealed()));
        assert_eq!(seq.state(), PassState::Running);
    }

    #[test]
    fn test_widths_survive_replay() {
        let mut seq = sequencer("ab", 0.0);
        seq.set_width(1, 7.5);
        seq.begin();
        assert_eq!(seq.cell(1).and_then(CharacterCell::width), Some(7.5));
        seq.set_width(9, 1.0); // ignored
    }

    #[test]
    fn test_completion_waits_for_wrapper_to_settle() {
        let mut seq = sequencer("Hi", 0.2);
        seq.begin();
        assert_eq!(seq.wrapper_opacity(), 0.0);

        let mut completions = 0;
        let mut last_char_at = None;
        let mut completed_at = None;
        for step in 1..=300 {
            let t = step as f32 * 0.01;
            for event in seq.update(0.01) {
                match event {
                    RevealEvent::CharacterRevealed { index: 1, .. } => last_char_at = Some(t),
                    RevealEvent::CharacterRevealed { .. } => {}
                    RevealEvent::SequenceComplete { .. } => {
                        assert!(seq.is_wrapper_settled());
                        completions += 1;
                        completed_at = Some(t);
                    }
                }
            }
            if !seq.is_wrapper_settled() {
                assert!(!seq.is_complete(), "completed at {}s with the wrapper moving", t);
            }
        }

        assert_eq!(completions, 1);
        let (last_char_at, completed_at) = (last_char_at.unwrap(), completed_at.unwrap());
        assert!(last_char_at < 0.4);
        assert!(completed_at > 1.0, "completed at {}s", completed_at);
        assert_eq!(seq.wrapper_opacity(), 1.0);
    }

    #[test]
    fn test_hide_resets_everything() {
        let mut seq = sequencer("ab", 0.0);
        seq.begin();
        let _ = seq.update(1.0);
        seq.hide();
        assert_eq!(seq.state(), PassState::Idle);
        assert_eq!(seq.wrapper_opacity(), 0.0);
        assert!(seq.cells().iter().all(|c| !c.is_revealed()));
    }

    #[test]
    fn test_degenerate_spring_falls_back_to_default() {
        let spring = SpringTransition {
            damping: 0.0,
            stiffness: -5.0,
            mass: 0.0,
        };
        let mut seq = RevealSequencer::new("a", 0.0, 0.15, spring);
        assert_eq!(seq.spring(), SpringTransition::default());

        seq.begin();
        let _ = seq.update(0.05);
        assert!(seq.wrapper_opacity().is_finite());
        let events = seq.update(5.0);
        assert_eq!(events.len(), 1);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_set_timing_starts_new_pass() {
        let mut seq = sequencer("ab", 0.0);
        seq.set_width(0, 4.0);
        seq.begin();
        let _ = seq.update(0.05);
        let before = seq.generation();

        seq.set_timing(0.5, SpringTransition { mass: f32::NAN, ..SpringTransition::default() });
        assert!(seq.generation() > before);
        assert_eq!(seq.state(), PassState::Idle);
        assert_eq!(seq.stagger(), 0.5);
        assert_eq!(seq.spring().mass, 1.0);
        assert_eq!(seq.cell(0).and_then(CharacterCell::width), Some(4.0));
    }

    #[test]
    fn test_negative_delay_is_clamped() {
        let seq = RevealSequencer::new("a", -1.0, f32::NAN, SpringTransition::default());
        assert_eq!(seq.delay(), 0.0);
        assert_eq!(seq.stagger(), 0.0);
    }
}
