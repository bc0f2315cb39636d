//! Debounced search input.

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::config::{Config, DEFAULT_DEBOUNCE_MS};

/// Delay between the last keystroke and the committed search term.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

/// Raw text updated on every keystroke and a committed term that follows it
/// once input has been quiet for the configured delay.
///
/// Must be created inside a tokio runtime. Dropping it cancels any pending
/// commit.
pub struct DebouncedSearch {
    raw: watch::Sender<String>,
    committed: watch::Receiver<String>,
    _timer: DropGuard,
}

impl DebouncedSearch {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_DELAY)
    }

    /// Uses the configured `debounce_ms`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_delay(config.debounce())
    }

    pub fn with_delay(delay: Duration) -> Self {
        let (raw_tx, mut raw_rx) = watch::channel(String::new());
        let (committed_tx, committed_rx) = watch::channel(String::new());
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => return,
                    changed = raw_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
                // Every further change restarts the timer.
                loop {
                    tokio::select! {
                        _ = cancelled.cancelled() => return,
                        changed = raw_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                        _ = tokio::time::sleep(delay) => {
                            let value = raw_rx.borrow_and_update().clone();
                            committed_tx.send_if_modified(|current| {
                                if *current == value {
                                    false
                                } else {
                                    *current = value;
                                    true
                                }
                            });
                            break;
                        }
                    }
                }
            }
        });

        Self {
            raw: raw_tx,
            committed: committed_rx,
            _timer: token.drop_guard(),
        }
    }

    /// Record a keystroke.
    pub fn input(&self, text: impl Into<String>) {
        self.raw.send_replace(text.into());
    }

    pub fn raw(&self) -> String {
        self.raw.borrow().clone()
    }

    pub fn committed(&self) -> String {
        self.committed.borrow().clone()
    }

    /// Receiver of committed terms.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.committed.clone()
    }
}

impl Default for DebouncedSearch {
    fn default() -> Self {
        Self::new()
    }
}
