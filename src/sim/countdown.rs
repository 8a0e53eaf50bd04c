//! Millisecond countdowns advanced by the simulation tick
//!
//! Mode durations, bonus lifetimes and respawn freezes all live inside the
//! state as plain counters, so pausing the tick pauses them too and a reset
//! throws them away with the rest of the state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Countdown {
    remaining_ms: u32,
}

impl Countdown {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            remaining_ms: duration_ms,
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    pub fn start(&mut self, duration_ms: u32) {
        self.remaining_ms = duration_ms;
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = 0;
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Advance by `dt_ms`. Returns true only on the tick that reaches zero.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        if self.remaining_ms == 0 {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
        self.remaining_ms == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once() {
        let mut c = Countdown::new(40);
        assert!(!c.tick(16));
        assert!(!c.tick(16));
        assert!(c.tick(16));
        assert!(!c.is_active());
        assert!(!c.tick(16));
    }

    #[test]
    fn test_cancel_never_fires() {
        let mut c = Countdown::new(10);
        c.cancel();
        assert!(!c.tick(10));
    }
}
