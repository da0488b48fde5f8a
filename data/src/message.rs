use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use fancy_regex::Regex;
use serde::Deserialize;
use url::Url;

pub use self::badge::Badge;
pub use self::highlight::Highlight;
use crate::palette::Color;

pub mod badge;
pub mod highlight;

/// Pre-parsed IRCv3 message tags.
pub type Tags = HashMap<String, String>;

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+")
        .expect("valid link regex")
});

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u16 {
        const SUBSCRIPTION = 1 << 0;
        const HIGHLIGHTED = 1 << 1;
        const SHOW_IN_MENTIONS = 1 << 2;
        const COLLAPSED = 1 << 3;
        const WHISPER = 1 << 4;
        const SYSTEM = 1 << 5;
        const ACTION = 1 << 6;
        const DISABLED = 1 << 7;
        const TIMEOUT = 1 << 8;
        const FIRST_MESSAGE = 1 << 9;
        const REPLY = 1 << 10;
    }
}

/// A single message flag, as named in search queries (`is:sub`) and in
/// received message records (`"subscription"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    #[strum(serialize = "sub", serialize = "subscription")]
    Subscription,
    #[strum(serialize = "highlighted")]
    Highlighted,
    #[serde(alias = "mention")]
    #[strum(serialize = "mention")]
    ShowInMentions,
    #[strum(serialize = "collapsed")]
    Collapsed,
    #[strum(serialize = "whisper")]
    Whisper,
    #[strum(serialize = "system")]
    System,
    #[strum(serialize = "action")]
    Action,
    #[serde(alias = "deleted")]
    #[strum(serialize = "deleted", serialize = "disabled")]
    Disabled,
    #[serde(alias = "ban")]
    #[strum(serialize = "timeout", serialize = "ban")]
    Timeout,
    #[serde(alias = "first-msg")]
    #[strum(serialize = "first-msg")]
    FirstMessage,
    #[strum(serialize = "reply")]
    Reply,
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Subscription => Flags::SUBSCRIPTION,
            Flag::Highlighted => Flags::HIGHLIGHTED,
            Flag::ShowInMentions => Flags::SHOW_IN_MENTIONS,
            Flag::Collapsed => Flags::COLLAPSED,
            Flag::Whisper => Flags::WHISPER,
            Flag::System => Flags::SYSTEM,
            Flag::Action => Flags::ACTION,
            Flag::Disabled => Flags::DISABLED,
            Flag::Timeout => Flags::TIMEOUT,
            Flag::FirstMessage => Flags::FIRST_MESSAGE,
            Flag::Reply => Flags::REPLY,
        }
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<T: IntoIterator<Item = Flag>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Flags::empty(), |flags, flag| flags | Flags::from(flag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Sent,
    #[default]
    Received,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub channel: String,
    pub login_name: String,
    pub text: String,
    pub flags: Flags,
    pub highlight_color: Option<Color>,
    pub badges: Vec<Badge>,
    pub links: Vec<Url>,
}

impl Message {
    pub fn new(
        channel: impl Into<String>,
        login_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();

        Self {
            timestamp: Utc::now(),
            direction: Direction::Received,
            channel: channel.into(),
            login_name: login_name.into(),
            links: links(&text),
            text,
            flags: Flags::COLLAPSED,
            highlight_color: None,
            badges: vec![],
        }
    }

    pub fn with_flags(mut self, flags: impl Into<Flags>) -> Self {
        self.flags |= flags.into();
        self
    }

    pub fn with_badges(mut self, badges: Vec<Badge>) -> Self {
        self.badges = badges;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn has_link(&self) -> bool {
        !self.links.is_empty()
    }

    pub fn is_received_whisper(&self) -> bool {
        self.flags.contains(Flags::WHISPER)
            && matches!(self.direction, Direction::Received)
    }
}

/// A message record as handed over by the protocol layer, one per line of a
/// JSON history file.
#[derive(Debug, Clone, Deserialize)]
pub struct Received {
    pub channel: String,
    #[serde(alias = "user")]
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub flags: Vec<Flag>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Received {
    pub fn into_message(self) -> Message {
        let badges = badge::parse(&self.tags);
        let flags = self.flags.into_iter().collect::<Flags>();

        let mut message = Message::new(self.channel, self.author, self.text)
            .with_flags(flags)
            .with_badges(badges)
            .with_direction(self.direction);

        if let Some(timestamp) = self.timestamp {
            message.timestamp = timestamp;
        }

        message
    }
}

fn links(text: &str) -> Vec<Url> {
    LINK_REGEX
        .find_iter(text)
        .filter_map(Result::ok)
        .filter_map(|found| {
            let link = found
                .as_str()
                .trim_end_matches(['.', ',', ')', '!', '?', ':', ';', '"']);

            if link.len() >= 4 && link[..4].eq_ignore_ascii_case("www.") {
                Url::parse(&format!("https://{link}")).ok()
            } else {
                Url::parse(link).ok()
            }
        })
        .collect()
}
