//! Message log shared between game callbacks and renderers.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Severity level for messages shown to the player.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageLevel {
    Info,
    Warning,
}

/// Snapshot of a single message entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEntry {
    pub text: String,
    pub timestamp: Option<u64>,
    pub level: MessageLevel,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, timestamp: Option<u64>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            timestamp,
            level,
        }
    }
}

/// Bounded buffer of messages displayed to the player.
///
/// Cloning yields another handle to the same buffer, so engine callbacks and
/// renderers can each hold one.
#[derive(Clone, Debug)]
pub struct MessageLog {
    inner: Rc<RefCell<Buffer>>,
}

#[derive(Debug)]
struct Buffer {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            inner: Rc::new(RefCell::new(Buffer {
                entries: VecDeque::with_capacity(bounded_capacity),
                capacity: bounded_capacity,
            })),
        }
    }

    pub fn push(&self, entry: MessageEntry) {
        let mut buffer = self.inner.borrow_mut();
        if buffer.entries.len() == buffer.capacity {
            buffer.entries.pop_front();
        }
        buffer.entries.push_back(entry);
    }

    pub fn push_text(&self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, None, MessageLevel::Info));
    }

    pub fn push_at(&self, timestamp: u64, message: impl Into<String>) {
        self.push(MessageEntry::new(message, Some(timestamp), MessageLevel::Info));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, None, MessageLevel::Warning));
    }

    /// Most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<MessageEntry> {
        self.inner
            .borrow()
            .entries
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Removes and returns every entry, oldest first.
    pub fn drain(&self) -> Vec<MessageEntry> {
        self.inner.borrow_mut().entries.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub fn texts(&self) -> Vec<String> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|e| e.text.clone())
            .collect()
    }
}

/// Format a message entry with optional timestamp.
pub fn format_message(entry: &MessageEntry) -> String {
    match entry.timestamp {
        Some(ts) => format!("[{}] {}", ts, entry.text),
        None => entry.text.clone(),
    }
}
