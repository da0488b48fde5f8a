use fancy_regex::{Regex, RegexBuilder};
use itertools::Itertools;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::message::Badge;
use crate::palette::Color;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Highlights {
    pub subscription: Builtin,
    pub whisper: Builtin,
    #[serde(rename = "self")]
    pub own_nick: OwnNick,
    pub users: Vec<Rule>,
    #[serde(rename = "match")]
    pub matches: Vec<Rule>,
    pub badges: Vec<BadgeRule>,
    /// Users whose messages never highlight.
    pub blocked: Vec<String>,
    pub colors: Colors,
}

impl Highlights {
    pub fn is_blocked(&self, login_name: &str) -> bool {
        self.blocked
            .iter()
            .any(|blocked| blocked.eq_ignore_ascii_case(login_name))
    }

    /// Custom sounds referenced anywhere in the highlight rules.
    pub fn sound_urls(&self) -> impl Iterator<Item = &Url> {
        [
            &self.subscription.sound_url,
            &self.whisper.sound_url,
            &self.own_nick.sound_url,
        ]
        .into_iter()
        .flatten()
        .chain(self.users.iter().filter_map(|rule| rule.sound_url.as_ref()))
        .chain(self.matches.iter().filter_map(|rule| rule.sound_url.as_ref()))
        .chain(self.badges.iter().filter_map(|rule| rule.sound_url.as_ref()))
    }
}

/// Subscription and whisper highlighting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Builtin {
    pub enabled: bool,
    pub alert: bool,
    pub sound: bool,
    pub sound_url: Option<Url>,
}

/// Highlighting of messages mentioning the local user's name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwnNick {
    pub enabled: bool,
    pub alert: bool,
    pub sound: bool,
    pub sound_url: Option<Url>,
    pub show_in_mentions: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub highlight: Color,
    pub subscription: Color,
    pub whisper: Color,
    pub self_highlight: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            highlight: Color::rgb(0x7f, 0x3f, 0x49),
            subscription: Color::rgb(0xc4, 0x66, 0xff),
            whisper: Color::rgb(0xee, 0x7c, 0x3b),
            self_highlight: Color::rgb(0x7f, 0x3f, 0x49),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Matches any of `words` as a whole word.
    pub fn words(
        words: &[String],
        case_insensitive: bool,
    ) -> Result<Self, PatternError> {
        let words = words
            .iter()
            .filter(|word| !word.is_empty())
            .map(|word| fancy_regex::escape(word))
            .join("|");

        if words.is_empty() {
            return Err(PatternError::Empty);
        }

        let regex = format!(r#"(?<!\w)({words})(?!\w)"#);

        Self::regex(&regex, case_insensitive)
    }

    pub fn regex(
        regex: &str,
        case_insensitive: bool,
    ) -> Result<Self, PatternError> {
        let flags = if case_insensitive { "(?i)" } else { "" };

        let compiled = RegexBuilder::new(&format!("{flags}{regex}"))
            .build()
            .map_err(|error| PatternError::Regex {
                regex: regex.to_string(),
                reason: error.to_string(),
            })?;

        Ok(Self {
            source: regex.to_string(),
            regex: compiled,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Backtracking limits reached while matching count as no match.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text).unwrap_or_else(|error| {
            log::debug!("highlight pattern {:?} failed: {error}", self.source);
            false
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("no words to match")]
    Empty,
    #[error("invalid regex '{regex}': {reason}")]
    Regex { regex: String, reason: String },
}

/// A user or phrase highlight rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Pattern,
    pub alert: bool,
    pub sound: bool,
    pub sound_url: Option<Url>,
    pub color: Option<Color>,
    pub show_in_mentions: bool,
}

impl Rule {
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Debug, Clone, Deserialize)]
        #[serde(untagged)]
        enum Matching {
            Words {
                words: Vec<String>,
                #[serde(default = "default_case_insensitive")]
                case_insensitive: bool,
            },
            Regex {
                regex: String,
                #[serde(default)]
                case_insensitive: bool,
            },
        }

        #[derive(Debug, Clone, Deserialize)]
        struct Inner {
            #[serde(flatten)]
            matching: Matching,
            #[serde(default)]
            alert: bool,
            #[serde(default)]
            sound: bool,
            #[serde(default)]
            sound_url: Option<Url>,
            #[serde(default)]
            color: Option<Color>,
            #[serde(default)]
            show_in_mentions: bool,
        }

        let Inner {
            matching,
            alert,
            sound,
            sound_url,
            color,
            show_in_mentions,
        } = Inner::deserialize(deserializer)?;

        let pattern = match matching {
            Matching::Words {
                words,
                case_insensitive,
            } => Pattern::words(&words, case_insensitive),
            Matching::Regex {
                regex,
                case_insensitive,
            } => Pattern::regex(&regex, case_insensitive),
        }
        .map_err(serde::de::Error::custom)?;

        Ok(Rule {
            pattern,
            alert,
            sound,
            sound_url,
            color,
            show_in_mentions,
        })
    }
}

fn default_case_insensitive() -> bool {
    true
}

/// Matches a badge by set name, and by version when written as
/// `name/version`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct BadgeMatch {
    pub name: String,
    pub version: Option<String>,
}

impl From<String> for BadgeMatch {
    fn from(value: String) -> Self {
        match value.split_once('/') {
            Some((name, version)) => Self {
                name: name.to_string(),
                version: Some(version.to_string()),
            },
            None => Self {
                name: value,
                version: None,
            },
        }
    }
}

impl BadgeMatch {
    pub fn is_match(&self, badge: &Badge) -> bool {
        self.name == badge.name
            && self
                .version
                .as_ref()
                .is_none_or(|version| *version == badge.version)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BadgeRule {
    pub badge: BadgeMatch,
    #[serde(default)]
    pub alert: bool,
    #[serde(default)]
    pub sound: bool,
    #[serde(default)]
    pub sound_url: Option<Url>,
    #[serde(default)]
    pub color: Option<Color>,
}

impl BadgeRule {
    pub fn is_match(&self, badge: &Badge) -> bool {
        self.badge.is_match(badge)
    }
}
