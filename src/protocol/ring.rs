// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! Fixed-capacity host-word ring buffer with flow-control threshold edges.
//!
//! Protocol-agnostic: knows nothing about opcodes, echo, or GSW. Erase-abort
//! bookkeeping and command interpretation live one layer up, in
//! [`crate::protocol::classifier`].

use crate::config::{HOST_IN_WORDS, XOFF1_LIMIT, XOFF2_LIMIT, XON1_LIMIT, XON2_LIMIT};

/// A flow-control signal raised by crossing a depth threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEdge {
    Xoff,
    Xon,
}

#[derive(Debug)]
pub struct Ring {
    buf: Box<[u32; HOST_IN_WORDS]>,
    head: usize,
    tail: usize,
}

impl Ring {
    pub fn new() -> Self {
        Self {
            buf: Box::new([0; HOST_IN_WORDS]),
            head: 0,
            tail: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn count(&self) -> usize {
        (self.head + HOST_IN_WORDS - self.tail) % HOST_IN_WORDS
    }

    /// Enqueue a word. Returns the flow-control edge crossed by this
    /// enqueue, if any. Drops (and logs) the word on overflow rather than
    /// overwriting the oldest entry.
    pub fn enqueue(&mut self, word: u32) -> Option<FlowEdge> {
        let next_head = (self.head + 1) % HOST_IN_WORDS;
        if next_head == self.tail {
            log::error!("ring buffer overflow, dropping word {word:#x}");
            return None;
        }
        debug_assert!(self.head < HOST_IN_WORDS && self.tail < HOST_IN_WORDS);
        self.buf[self.head] = word;
        self.head = next_head;
        let count = self.count();
        if count == XOFF1_LIMIT || count == XOFF2_LIMIT {
            Some(FlowEdge::Xoff)
        } else {
            None
        }
    }

    /// Dequeue a word. Returns `None` if empty. Returns the flow-control
    /// edge crossed by this dequeue alongside the word, if any.
    pub fn dequeue(&mut self) -> Option<(u32, Option<FlowEdge>)> {
        if self.is_empty() {
            return None;
        }
        debug_assert!(self.head < HOST_IN_WORDS && self.tail < HOST_IN_WORDS);
        let word = self.buf[self.tail];
        self.tail = (self.tail + 1) % HOST_IN_WORDS;
        let count = self.count();
        let edge = if count == XON1_LIMIT || count == XON2_LIMIT {
            Some(FlowEdge::Xon)
        } else {
            None
        };
        Some((word, edge))
    }

    /// Discard all pending output by advancing the tail to the head, e.g.
    /// on a STOP/STOP1 key from the terminal.
    pub fn abort_all(&mut self) {
        self.tail = self.head;
    }
}

impl Default for Ring {
    fn default() -> Self {
        Self::new()
    }
}
