use fancy_regex::{Regex, RegexBuilder};

use crate::message::{Flag, Flags, Message};

/// A boolean test applied to one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Substring(Substring),
    Regex(Pattern),
    Author(Vec<String>),
    Channel(Vec<String>),
    Link,
    Flags(Flags),
}

impl Predicate {
    pub fn substring(text: impl Into<String>) -> Self {
        Self::Substring(Substring::new(text))
    }

    pub fn regex(pattern: impl Into<String>, case_insensitive: bool) -> Self {
        Self::Regex(Pattern::new(pattern, case_insensitive))
    }

    /// Comma separated flag names. Unknown names are skipped.
    pub fn flags(names: &str) -> Self {
        Self::Flags(
            names
                .split(',')
                .filter_map(|name| name.parse::<Flag>().ok())
                .collect(),
        )
    }

    pub fn matches(&self, message: &Message) -> bool {
        match self {
            Predicate::Substring(substring) => substring.matches(&message.text),
            Predicate::Regex(pattern) => pattern.matches(&message.text),
            Predicate::Author(authors) => authors
                .iter()
                .any(|author| eq_ignore_case(author, &message.login_name)),
            Predicate::Channel(channels) => channels
                .iter()
                .any(|channel| eq_ignore_case(channel, &message.channel)),
            Predicate::Link => message.has_link(),
            Predicate::Flags(flags) => message.flags.intersects(*flags),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substring {
    text: String,
    lowercase: String,
}

impl Substring {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();

        Self {
            lowercase: text.to_lowercase(),
            text,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn matches(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.lowercase)
    }
}

/// A regex compiled once at parse time. Invalid patterns are kept around so
/// they can be shown back to the user, but never match.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new(source: impl Into<String>, case_insensitive: bool) -> Self {
        let source = source.into();
        let flags = if case_insensitive { "(?i)" } else { "" };

        let regex = RegexBuilder::new(&format!("{flags}{source}"))
            .build()
            .inspect_err(|error| {
                log::debug!("invalid search regex {source:?}: {error}");
            })
            .ok();

        Self { source, regex }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    fn matches(&self, text: &str) -> bool {
        self.regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(text).unwrap_or(false))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.regex.as_ref().map(Regex::as_str)
                == other.regex.as_ref().map(Regex::as_str)
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
