// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manual-reset wakeup signal for blocked receivers.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

/// One-shot, manually reset signal with `set`/`clear`/`wait(timeout)`.
///
/// Receivers must clear the signal *before* draining the queue; a message
/// arriving between the drain and the wait re-raises the flag, so the wait
/// returns immediately instead of missing the wakeup.
#[derive(Debug, Default)]
pub struct MessageEvent {
    raised: Mutex<bool>,
    notify: Notify,
}

impl MessageEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal and wake every current waiter.
    pub fn set(&self) {
        *self.raised.lock() = true;
        self.notify.notify_waiters();
    }

    /// Lower the signal.
    pub fn clear(&self) {
        *self.raised.lock() = false;
    }

    pub fn is_set(&self) -> bool {
        *self.raised.lock()
    }

    /// Wait until the signal is raised or `timeout` elapses.
    ///
    /// Returns whether the signal was raised. A zero timeout reports the
    /// current state without suspending.
    pub async fn wait(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now()
            .checked_add(timeout)
            .unwrap_or_else(|| tokio::time::Instant::now() + Duration::from_secs(86_400 * 365 * 100));
        loop {
            // Register interest before checking the flag, so a set() between
            // the check and the await still wakes us.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if *self.raised.lock() {
                return true;
            }
            match tokio::time::timeout_at(deadline, notified).await {
                Ok(()) => continue,
                Err(_) => return *self.raised.lock(),
            }
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
