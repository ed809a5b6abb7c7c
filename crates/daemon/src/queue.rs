// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thread-safe bounded FIFO of inbound messages.

use std::collections::VecDeque;

use chat_core::Message;
use parking_lot::Mutex;

/// Queue capacity; the oldest message is evicted when a push would exceed it.
pub const QUEUE_CAPACITY: usize = 100;

/// Inbound message queue shared by connection handlers.
///
/// Overflow is silent — callers who care must drain promptly.
#[derive(Debug)]
pub struct MessageQueue {
    inner: Mutex<VecDeque<Message>>,
    capacity: usize,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::with_capacity(QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Push a message, evicting from the head when full.
    pub fn push(&self, message: Message) {
        let mut queue = self.inner.lock();
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(message);
    }

    /// Remove and return every queued message, oldest first.
    pub fn drain(&self) -> Vec<Message> {
        self.inner.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
