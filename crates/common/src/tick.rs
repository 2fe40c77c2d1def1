//! Redraw tick control for the live preview.
//!
//! The preview repaints on a continuous tick so it keeps up with the
//! camera, and eagerly after every state-changing input event. Redundant
//! repaints are harmless because rendering never mutates model state.

use std::time::{Duration, Instant};

/// Rate controller for the continuous redraw loop.
#[derive(Debug, Clone)]
pub struct RedrawTicker {
    interval: Duration,
    last_tick: Option<Instant>,
    dirty: bool,
}

impl RedrawTicker {
    /// Create a ticker targeting the given Hz rate. A rate of zero is treated as 1 Hz.
    pub fn new(target_hz: u32) -> Self {
        Self {
            interval: Duration::from_nanos(1_000_000_000 / target_hz.max(1) as u64),
            last_tick: None,
            dirty: false,
        }
    }

    /// Request an immediate redraw on the next check.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether an eager redraw has been requested.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check whether a redraw should happen at `now`.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true, as does any call after `mark_dirty`.
    pub fn should_redraw(&mut self, now: Instant) -> bool {
        let due = match self.last_tick {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };

        if due || self.dirty {
            self.last_tick = Some(now);
            self.dirty = false;
            true
        } else {
            false
        }
    }

    /// Target interval between continuous ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
