//! Input-method composition guard for the lookup field.
//!
//! While an IME composition is in progress, Enter confirms the composed text
//! and must not submit the lookup. Some platforms deliver that Enter right
//! after the composition-end event, so Enter stays suppressed for a short
//! grace window after composition ends.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct CompositionGuard {
    composing: bool,
    ended_at: Option<Instant>,
    grace: Duration,
}

impl CompositionGuard {
    pub fn new(grace: Duration) -> Self {
        Self { composing: false, ended_at: None, grace }
    }

    pub fn composition_start(&mut self) {
        self.composing = true;
    }

    pub fn composition_end(&mut self) {
        self.composition_end_at(Instant::now());
    }

    pub fn composition_end_at(&mut self, now: Instant) {
        self.composing = false;
        self.ended_at = Some(now);
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Whether an Enter key pressed at `now` should submit the lookup.
    pub fn should_submit_on_enter(&self, now: Instant) -> bool {
        if self.composing {
            return false;
        }
        match self.ended_at {
            Some(ended) => now.saturating_duration_since(ended) >= self.grace,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_during_composition_is_suppressed() {
        let mut guard = CompositionGuard::new(Duration::from_millis(50));
        let now = Instant::now();
        assert!(guard.should_submit_on_enter(now));
        guard.composition_start();
        assert!(!guard.should_submit_on_enter(now));
    }

    #[test]
    fn grace_window_follows_composition_end() {
        let mut guard = CompositionGuard::new(Duration::from_millis(50));
        let ended = Instant::now();
        guard.composition_start();
        guard.composition_end_at(ended);
        assert!(!guard.is_composing());
        assert!(!guard.should_submit_on_enter(ended + Duration::from_millis(10)));
        assert!(guard.should_submit_on_enter(ended + Duration::from_millis(50)));
    }
}
