use std::collections::VecDeque;
use std::ops::Index;
use std::sync::Arc;

pub use self::filter::{Filter, FilterChain};
use crate::message::{Flags, Message};

pub mod filter;

/// Default # messages kept per channel
pub const DEFAULT_LIMIT: usize = 1_000;

/// Live, bounded message buffer of one channel. Pushing past the limit drops
/// the oldest messages.
#[derive(Debug, Clone)]
pub struct Buffer {
    messages: VecDeque<Arc<Message>>,
    limit: usize,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl Buffer {
    pub fn new(limit: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, message: impl Into<Arc<Message>>) {
        if self.messages.len() == self.limit {
            self.messages.pop_front();
        }

        self.messages.push_back(message.into());
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.push(message);
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Captures the current contents. Later pushes don't affect the snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.messages.iter().cloned().collect())
    }

    /// Snapshot of the messages flagged to show in mentions.
    pub fn mentions(&self) -> Snapshot {
        Snapshot(
            self.messages
                .iter()
                .filter(|message| {
                    message.flags.contains(Flags::SHOW_IN_MENTIONS)
                })
                .cloned()
                .collect(),
        )
    }
}

/// Immutable, chronologically ordered view of a [`Buffer`]. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Snapshot(Arc<[Arc<Message>]>);

impl Snapshot {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Message>> {
        self.0.iter()
    }
}

impl Index<usize> for Snapshot {
    type Output = Arc<Message>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<Arc<Message>> for Snapshot {
    fn from_iter<T: IntoIterator<Item = Arc<Message>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
