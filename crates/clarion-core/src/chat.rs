//! Chat thread transcript types.

use serde::{Deserialize, Serialize};

/// Who authored a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The user asking for clarification.
    Human,
    /// The backend language-model agent.
    Agent,
}

/// A single message in a clarification thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub sender: Sender,
    pub content: String,
}

impl ChatEntry {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Human,
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Agent,
            content: content.into(),
        }
    }
}

/// The transcript of the open thread.
///
/// The poller replaces it wholesale on every tick (no incremental merge);
/// a locally sent message is appended optimistically and survives until the
/// next replacement surfaces the server-side copy. Both mutations raise a
/// scroll-to-bottom signal the front end consumes once per redraw.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
    scroll_pending: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wholesale replacement from a history fetch.
    pub fn replace(&mut self, entries: Vec<ChatEntry>) {
        self.entries = entries;
        self.scroll_pending = true;
    }

    /// Optimistic local append.
    pub fn push(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
        self.scroll_pending = true;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_pending = false;
    }

    /// Consumes the pending scroll-to-bottom signal.
    pub fn take_scroll_signal(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }
}
