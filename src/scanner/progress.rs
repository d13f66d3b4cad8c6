//! Progress reporting decoupled from scan logic.
//!
//! Scanners tick a `Progress` once per completed unit of work (a probe for
//! the port scanner, a host for the sweeper). The terminal front end plugs
//! in an `indicatif` bar; tests plug in a `ProgressCounter`.

use indicatif::ProgressBar;
use std::sync::atomic::{AtomicU64, Ordering};

/// Receives progress notifications.
pub trait Progress: Send + Sync {
    /// Called once before any work, with the number of units expected.
    fn start(&self, _total: u64) {}

    /// Called once per completed unit, whatever its outcome.
    fn advance(&self);

    /// Called once after the last unit.
    fn finish(&self) {}
}

/// Discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn advance(&self) {}
}

/// Counts notifications. Useful for tests and summaries.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    total: AtomicU64,
    completed: AtomicU64,
    starts: AtomicU64,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units completed since the last `start`.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    /// Total announced by the last `start`.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    /// Number of times `start` was called.
    pub fn starts(&self) -> u64 {
        self.starts.load(Ordering::SeqCst)
    }
}

impl Progress for ProgressCounter {
    fn start(&self, total: u64) {
        self.total.store(total, Ordering::SeqCst);
        self.completed.store(0, Ordering::SeqCst);
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn advance(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Drives an `indicatif` bar. `start` resets it, so one bar can be reused
/// for every host of a sweep.
impl Progress for ProgressBar {
    fn start(&self, total: u64) {
        self.reset();
        self.set_length(total);
    }

    fn advance(&self) {
        self.inc(1);
    }

    fn finish(&self) {
        self.set_position(self.length().unwrap_or(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_resets_on_start() {
        let counter = ProgressCounter::new();
        counter.start(3);
        counter.advance();
        counter.advance();
        assert_eq!(counter.completed(), 2);

        counter.start(5);
        assert_eq!(counter.completed(), 0);
        assert_eq!(counter.total(), 5);
        assert_eq!(counter.starts(), 2);
    }

    #[test]
    fn test_progress_bar_reuse() {
        let bar = ProgressBar::hidden();
        bar.start(10);
        bar.advance();
        assert_eq!(bar.position(), 1);

        bar.start(4);
        assert_eq!(bar.position(), 0);
        assert_eq!(bar.length(), Some(4));
        bar.finish();
        assert_eq!(bar.position(), 4);
    }
}
