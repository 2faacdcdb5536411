//! Control messages delivered to the engine.
//!
//! The realtime thread drains pending messages at the start of each block,
//! so note changes always take effect on a block boundary.

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
}

/// Source of pending control messages, drained without blocking.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<EngineMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<EngineMessage> {
    fn pop(&mut self) -> Option<EngineMessage> {
        Consumer::pop(self).ok()
    }
}

/// A slice of queued messages; handy in tests and offline rendering.
impl MessageReceiver for std::vec::IntoIter<EngineMessage> {
    fn pop(&mut self) -> Option<EngineMessage> {
        self.next()
    }
}
