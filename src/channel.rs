// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! FIFO queues decoupling program-level input and output from caller timing

use std::collections::VecDeque;

/// An unbounded FIFO of signed 64-bit values.
///
/// One instance feeds the machine's input instructions; another collects its
/// output. The machine never clears the output channel itself; values sit
/// queued until the caller drains them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Channel {
    queue: VecDeque<i64>,
}

impl Channel {
    /// Append `value` at the tail
    pub(crate) fn push(&mut self, value: i64) {
        self.queue.push_back(value);
    }

    /// Remove and return the value at the head, if any
    pub(crate) fn pop(&mut self) -> Option<i64> {
        self.queue.pop_front()
    }

    /// The value at the head, without removing it
    pub(crate) fn peek(&self) -> Option<i64> {
        self.queue.front().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Remove and return everything queued, oldest first
    pub(crate) fn drain(&mut self) -> Vec<i64> {
        self.queue.drain(..).collect()
    }
}

impl Extend<i64> for Channel {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        self.queue.extend(iter);
    }
}

impl FromIterator<i64> for Channel {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}
