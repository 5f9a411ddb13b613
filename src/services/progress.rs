// src/services/progress.rs
//
// Progress & Message Observables
//
// Written only by the pipeline, read by anyone. Each signal is a
// last-write-wins watch channel; there is no ordering guarantee between
// distinct signals.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Sub-progress of the remote call currently in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FetchProgress {
    /// A call is running and its length is unknown
    Indeterminate,
    Bounded(f64),
}

impl FetchProgress {
    pub fn idle() -> Self {
        FetchProgress::Bounded(0.0)
    }
}

impl Default for FetchProgress {
    fn default() -> Self {
        Self::idle()
    }
}

pub struct ProgressReporter {
    message: watch::Sender<Option<String>>,
    progress: watch::Sender<f64>,
    fetch_progress: watch::Sender<FetchProgress>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            message: watch::Sender::new(None),
            progress: watch::Sender::new(0.0),
            fetch_progress: watch::Sender::new(FetchProgress::idle()),
        }
    }

    // ========================================================================
    // WRITERS (pipeline only)
    // ========================================================================

    pub fn message(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{}", message);
        self.message.send_replace(Some(message));
    }

    pub fn clear_message(&self) {
        self.message.send_replace(None);
    }

    /// Coarse progress of the current job, clamped to 0..=1
    pub fn set_progress(&self, value: f64) {
        self.progress.send_replace(value.clamp(0.0, 1.0));
    }

    /// `current` of `total` items done; an empty set counts as not started
    pub fn set_progress_of(&self, current: usize, total: usize) {
        if total == 0 {
            self.set_progress(0.0);
        } else {
            self.set_progress(current as f64 / total as f64);
        }
    }

    pub fn start_fetch(&self) {
        self.fetch_progress.send_replace(FetchProgress::Indeterminate);
    }

    pub fn stop_fetch(&self) {
        self.fetch_progress.send_replace(FetchProgress::idle());
    }

    /// Progress and fetch sub-progress back to zero; the message is kept
    pub fn reset(&self) {
        self.set_progress(0.0);
        self.stop_fetch();
    }

    // ========================================================================
    // READERS
    // ========================================================================

    pub fn current_message(&self) -> Option<String> {
        self.message.borrow().clone()
    }

    pub fn current_progress(&self) -> f64 {
        *self.progress.borrow()
    }

    pub fn current_fetch_progress(&self) -> FetchProgress {
        *self.fetch_progress.borrow()
    }

    pub fn subscribe_message(&self) -> watch::Receiver<Option<String>> {
        self.message.subscribe()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<f64> {
        self.progress.subscribe()
    }

    pub fn subscribe_fetch_progress(&self) -> watch::Receiver<FetchProgress> {
        self.fetch_progress.subscribe()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins_without_subscribers() {
        let progress = ProgressReporter::new();

        progress.message("first");
        progress.message("second");

        assert_eq!(progress.current_message().as_deref(), Some("second"));

        progress.clear_message();
        assert_eq!(progress.current_message(), None);
    }

    #[test]
    fn test_progress_of_handles_empty_total() {
        let progress = ProgressReporter::new();

        progress.set_progress_of(3, 10);
        assert!((progress.current_progress() - 0.3).abs() < f64::EPSILON);

        progress.set_progress_of(0, 0);
        assert_eq!(progress.current_progress(), 0.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        let progress = ProgressReporter::new();
        progress.set_progress(1.5);
        assert_eq!(progress.current_progress(), 1.0);
    }

    #[test]
    fn test_fetch_toggles_indeterminate_then_idle() {
        let progress = ProgressReporter::new();
        let rx = progress.subscribe_fetch_progress();

        progress.start_fetch();
        assert_eq!(*rx.borrow(), FetchProgress::Indeterminate);

        progress.stop_fetch();
        assert_eq!(*rx.borrow(), FetchProgress::Bounded(0.0));
    }

    #[test]
    fn test_subscriber_sees_latest_value() {
        let progress = ProgressReporter::new();
        let mut rx = progress.subscribe_message();

        progress.message("Searching 'Thief'...");

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_deref(), Some("Searching 'Thief'..."));
    }
}
