//! Error lifecycle: zero or one current error with an expiry countdown.
//!
//! # Design
//! The slot itself holds no timer. Every `raise` hands back a generation
//! number; whoever runs the countdown calls `expire` with it afterwards, and
//! the slot only clears if nothing newer was raised or dismissed meanwhile.

use std::time::Duration;

use crate::error::TodoError;

/// How long an error stays visible unless dismissed first.
pub const ERROR_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSlot {
    current: Option<TodoError>,
    generation: u64,
}

impl ErrorSlot {
    pub fn current(&self) -> Option<TodoError> {
        self.current
    }

    /// Replace whatever is shown and restart the countdown.
    pub fn raise(&mut self, error: TodoError) -> u64 {
        self.generation += 1;
        self.current = Some(error);
        self.generation
    }

    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.current = None;
    }

    /// Clear the error raised at `generation`. Returns whether anything
    /// changed.
    pub fn expire(&mut self, generation: u64) -> bool {
        if self.generation != generation || self.current.is_none() {
            return false;
        }
        self.current = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expire_clears_current_generation() {
        let mut slot = ErrorSlot::default();
        let generation = slot.raise(TodoError::Add);
        assert_eq!(slot.current(), Some(TodoError::Add));
        assert!(slot.expire(generation));
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn newer_error_survives_stale_countdown() {
        let mut slot = ErrorSlot::default();
        let first = slot.raise(TodoError::Add);
        let second = slot.raise(TodoError::Delete);
        assert!(!slot.expire(first));
        assert_eq!(slot.current(), Some(TodoError::Delete));
        assert!(slot.expire(second));
    }

    #[test]
    fn dismiss_invalidates_pending_countdown() {
        let mut slot = ErrorSlot::default();
        let generation = slot.raise(TodoError::Update);
        slot.dismiss();
        assert_eq!(slot.current(), None);
        assert!(!slot.expire(generation));
    }
}
