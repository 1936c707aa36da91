//! Imperative animation controls shared between a host and its widgets

use std::cell::RefCell;
use std::rc::Rc;

/// Commands retained for widgets that have not polled yet
const COMMAND_HISTORY: usize = 64;

/// Named animation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Everything at opacity 0
    #[default]
    Hidden,
    /// Everything revealed
    Visible,
}

/// A command issued through [`AnimationControls`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Animate towards a variant
    Start(Variant),
    /// Jump to a variant without animating
    Set(Variant),
    /// Freeze whatever is currently animating
    Stop,
}

#[derive(Debug, Default)]
struct ControlsState {
    current: Variant,
    stopped: bool,
    revision: u64,
    history: Vec<(u64, ControlCommand)>,
}

/// Handle used by a host to drive one or more animated widgets.
///
/// Cloning shares the same underlying state. Widgets read the handle on every
/// update and apply each command once, in issue order.
#[derive(Debug, Clone, Default)]
pub struct AnimationControls {
    inner: Rc<RefCell<ControlsState>>,
}

impl AnimationControls {
    /// Create a handle in the `Hidden` state
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, command: ControlCommand) {
        let mut state = self.inner.borrow_mut();
        state.revision += 1;
        let revision = state.revision;
        match command {
            ControlCommand::Start(variant) | ControlCommand::Set(variant) => {
                state.current = variant;
                state.stopped = false;
            }
            ControlCommand::Stop => state.stopped = true,
        }
        state.history.push((revision, command));
        if state.history.len() > COMMAND_HISTORY {
            let excess = state.history.len() - COMMAND_HISTORY;
            state.history.drain(..excess);
        }
        log::trace!("controls: {:?} (revision {})", command, revision);
    }

    /// Animate towards `variant`
    pub fn start(&self, variant: Variant) {
        self.push(ControlCommand::Start(variant));
    }

    /// Jump to `variant` immediately
    pub fn set(&self, variant: Variant) {
        self.push(ControlCommand::Set(variant));
    }

    /// Stop all running animations
    pub fn stop(&self) {
        self.push(ControlCommand::Stop);
    }

    /// Last requested variant
    pub fn current(&self) -> Variant {
        self.inner.borrow().current
    }

    /// Whether the last command was `stop`
    pub fn is_stopped(&self) -> bool {
        self.inner.borrow().stopped
    }

    /// Revision of the most recent command (0 = none issued)
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    /// Commands issued after `seen`, oldest first
    pub(crate) fn commands_since(&self, seen: u64) -> Vec<(u64, ControlCommand)> {
        self.inner
            .borrow()
            .history
            .iter()
            .filter(|(revision, _)| *revision > seen)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_controls_are_hidden() {
        let controls = AnimationControls::new();
        assert_eq!(controls.current(), Variant::Hidden);
        assert_eq!(controls.revision(), 0);
        assert!(controls.commands_since(0).is_empty());
    }

    #[test]
    fn test_commands_are_recorded_in_order() {
        let controls = AnimationControls::new();
        controls.start(Variant::Visible);
        controls.stop();
        controls.set(Variant::Hidden);

        let commands: Vec<_> = controls.commands_since(0).into_iter().map(|(_, c)| c).collect();
        assert_eq!(
            commands,
            vec![
                ControlCommand::Start(Variant::Visible),
                ControlCommand::Stop,
                ControlCommand::Set(Variant::Hidden),
            ]
        );
        assert_eq!(controls.current(), Variant::Hidden);
        assert!(!controls.is_stopped());
    }

    #[test]
    fn test_clones_share_state() {
        let controls = AnimationControls::new();
        let other = controls.clone();
        other.start(Variant::Visible);
        assert_eq!(controls.current(), Variant::Visible);
        assert_eq!(controls.revision(), 1);
    }

    #[test]
    fn test_commands_since_skips_seen() {
        let controls = AnimationControls::new();
        controls.start(Variant::Visible);
        let seen = controls.revision();
        controls.stop();

        let pending = controls.commands_since(seen);
        assert_eq!(pending, vec![(2, ControlCommand::Stop)]);
    }

    #[test]
    fn test_history_is_bounded() {
        let controls = AnimationControls::new();
        for _ in 0..(COMMAND_HISTORY + 10) {
            controls.stop();
        }
        assert_eq!(controls.commands_since(0).len(), COMMAND_HISTORY);
        assert_eq!(controls.revision(), (COMMAND_HISTORY + 10) as u64);
    }
}
