//! The live message window and the total ingestion counter.
//!
//! [`WindowStore`] only knows how to append and how to drop the oldest
//! entries. Deciding *when* to trim belongs to
//! [`CompressorState`](crate::state::CompressorState), which applies the
//! threshold trim and the steady-state FIFO clamp as two separate rules.

use crate::Message;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowStore {
    /// Retained messages, oldest first.
    messages: Vec<Message>,
    /// Messages ever ingested (or restored from an import).
    message_count: u64,
}

impl WindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a window from persisted parts. The length bound is not
    /// checked; the next append re-clamps it.
    pub fn restore(messages: Vec<Message>, message_count: u64) -> Self {
        Self {
            messages,
            message_count,
        }
    }

    /// Append a message and bump the counter. Returns the new length.
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.message_count += 1;
        self.messages.len()
    }

    /// Keep only the newest `keep` messages. Returns how many were dropped.
    pub fn retain_newest(&mut self, keep: usize) -> usize {
        let excess = self.messages.len().saturating_sub(keep);
        if excess > 0 {
            self.messages.drain(..excess);
        }
        excess
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    pub fn into_parts(self) -> (Vec<Message>, u64) {
        (self.messages, self.message_count)
    }
}
