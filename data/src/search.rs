use std::sync::Arc;

pub use self::predicate::Predicate;
pub use self::query::parse;
use crate::history::{Buffer, Snapshot};
use crate::message::Message;

pub mod predicate;
pub mod query;

/// A caller supplied acceptance test, applied after the parsed predicates.
pub trait FilterSet {
    fn accepts(&self, message: &Message) -> bool;
}

impl<F> FilterSet for F
where
    F: Fn(&Message) -> bool,
{
    fn accepts(&self, message: &Message) -> bool {
        self(message)
    }
}

/// Messages that passed a search, in their original order.
#[derive(Debug, Clone, Default)]
pub struct Channel {
    pub name: String,
    pub messages: Vec<Arc<Message>>,
}

impl Channel {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Keeps every message of `snapshot` satisfying all `predicates` and the
/// optional `filter_set`.
///
/// Predicates are evaluated in order and evaluation of a message stops at the
/// first predicate that fails.
pub fn filter(
    predicates: &[Predicate],
    name: &str,
    snapshot: &Snapshot,
    filter_set: Option<&dyn FilterSet>,
) -> Channel {
    let messages = snapshot
        .iter()
        .filter(|message| {
            predicates.iter().all(|predicate| predicate.matches(message))
                && filter_set.is_none_or(|set| set.accepts(message))
        })
        .cloned()
        .collect();

    Channel {
        name: name.to_string(),
        messages,
    }
}

/// Search over a captured history, re-run as the query is edited.
#[derive(Default)]
pub struct Search {
    channel: String,
    snapshot: Snapshot,
    filter_set: Option<Arc<dyn FilterSet>>,
}

impl Search {
    pub fn new(channel: impl Into<String>, buffer: &Buffer) -> Self {
        Self {
            channel: channel.into(),
            snapshot: buffer.snapshot(),
            filter_set: None,
        }
    }

    pub fn set_filter_set(&mut self, filter_set: Option<Arc<dyn FilterSet>>) {
        self.filter_set = filter_set;
    }

    /// Captures a fresh snapshot of `buffer` to search in.
    pub fn set_channel(&mut self, channel: impl Into<String>, buffer: &Buffer) {
        self.channel = channel.into();
        self.snapshot = buffer.snapshot();
    }

    pub fn search(&self, query: &str) -> Channel {
        let predicates = parse(query);

        log::trace!(
            "searching {} messages in {:?} with {} predicates",
            self.snapshot.len(),
            self.channel,
            predicates.len()
        );

        filter(
            &predicates,
            &self.channel,
            &self.snapshot,
            self.filter_set.as_deref(),
        )
    }

    pub fn title(&self) -> String {
        let history = match self.channel.as_str() {
            "/whispers" => "whispers".to_string(),
            "/mentions" => "mentions".to_string(),
            "" => "<empty>'s".to_string(),
            channel => format!("{channel}'s"),
        };

        format!("Searching in {history} history")
    }
}
