//! Cursor that follows the end of the revealed text

use crate::animation::{blink_opacity, EASE};

use super::types::BLINK_PERIOD;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CursorPhase {
    /// Not shown yet (opacity 0, no animation)
    Idle,
    /// Visible and blinking
    Blinking { elapsed: f32 },
    /// Hidden after the sequence completed
    Hidden,
}

/// Tracks the cursor's horizontal offset and blink state.
///
/// The offset is the running sum of revealed character widths, in the order
/// completions arrive.
#[derive(Debug, Clone)]
pub struct CursorTracker {
    offset: f32,
    phase: CursorPhase,
}

impl Default for CursorTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorTracker {
    pub fn new() -> Self {
        Self {
            offset: 0.0,
            phase: CursorPhase::Idle,
        }
    }

    /// Move past a revealed character of `width` pixels.
    ///
    /// `activate` turns the blink on if the cursor is not showing yet.
    pub fn advance(&mut self, width: f32, activate: bool) {
        self.offset += width.max(0.0);
        if activate && self.phase == CursorPhase::Idle {
            self.phase = CursorPhase::Blinking { elapsed: 0.0 };
        }
    }

    /// Handle the end of the reveal sequence
    pub fn finish(&mut self, hide: bool) {
        if hide {
            self.phase = CursorPhase::Hidden;
        }
    }

    /// Advance the blink animation
    pub fn update(&mut self, delta: f32) {
        if let CursorPhase::Blinking { elapsed } = &mut self.phase {
            *elapsed = (*elapsed + delta.max(0.0)) % BLINK_PERIOD;
        }
    }

    /// Back to offset 0, not shown
    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.phase = CursorPhase::Idle;
    }

    /// Horizontal offset in pixels
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_blinking(&self) -> bool {
        matches!(self.phase, CursorPhase::Blinking { .. })
    }

    pub fn is_hidden(&self) -> bool {
        self.phase == CursorPhase::Hidden
    }

    /// Current opacity
    pub fn opacity(&self) -> f32 {
        match self.phase {
            CursorPhase::Idle | CursorPhase::Hidden => 0.0,
            CursorPhase::Blinking { elapsed } => blink_opacity(elapsed / BLINK_PERIOD, EASE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle_and_invisible() {
        let cursor = CursorTracker::new();
        assert_eq!(cursor.offset(), 0.0);
        assert_eq!(cursor.opacity(), 0.0);
        assert!(!cursor.is_blinking());
    }

    #[test]
    fn test_advance_accumulates_and_activates() {
        let mut cursor = CursorTracker::new();
        cursor.advance(10.0, true);
        cursor.advance(4.5, true);
        assert_eq!(cursor.offset(), 14.5);
        assert!(cursor.is_blinking());
        assert_eq!(cursor.opacity(), 1.0);
    }

    #[test]
    fn test_advance_without_activation_only_moves() {
        let mut cursor = CursorTracker::new();
        cursor.advance(10.0, false);
        assert_eq!(cursor.offset(), 10.0);
        assert!(!cursor.is_blinking());
    }

    #[test]
    fn test_blink_cycles() {
        let mut cursor = CursorTracker::new();
        cursor.advance(1.0, true);

        cursor.update(0.5);
        assert!(cursor.opacity() < 0.01);

        cursor.update(0.5);
        assert!(cursor.opacity() > 0.99);
        assert!(cursor.is_blinking());
    }

    #[test]
    fn test_finish_with_hide_stops_blink() {
        let mut cursor = CursorTracker::new();
        cursor.advance(3.0, true);
        cursor.finish(true);
        assert!(cursor.is_hidden());
        assert!(!cursor.is_blinking());
        assert_eq!(cursor.opacity(), 0.0);

        // A later completion does not revive it
        cursor.advance(2.0, true);
        assert!(cursor.is_hidden());
        assert_eq!(cursor.offset(), 5.0);
    }

    #[test]
    fn test_finish_without_hide_keeps_blinking() {
        let mut cursor = CursorTracker::new();
        cursor.advance(3.0, true);
        cursor.finish(false);
        for _ in 0..100 {
            cursor.update(0.1);
        }
        assert!(cursor.is_blinking());
    }

    #[test]
    fn test_reset() {
        let mut cursor = CursorTracker::new();
        cursor.advance(3.0, true);
        cursor.finish(true);
        cursor.reset();
        assert_eq!(cursor.offset(), 0.0);
        assert!(!cursor.is_hidden());
        assert!(!cursor.is_blinking());
    }
}
