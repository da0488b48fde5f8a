use std::sync::LazyLock;

use fancy_regex::Regex;
use thiserror::Error;

use crate::Config;
use crate::message::Message;
use crate::search::FilterSet;

static CHANNEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[#&][^\x07, ]{1,49}").expect("valid channel regex")
});

/// A single ignore entry: `nick`, `#channel` or `#channel nick`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub target: FilterTarget,
    pub class: FilterClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClass {
    Channel(String),
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterTarget {
    User(String),
    Any,
}

impl FilterTarget {
    pub fn user_try_from_str(nick: &str) -> Result<Self, FilterError> {
        let nick = nick.trim();

        if nick.is_empty() {
            Ok(Self::Any)
        } else if nick.contains(char::is_whitespace) {
            Err(FilterError::InvalidNick(nick.to_string()))
        } else {
            Ok(Self::User(nick.to_string()))
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unable to generate filter from nickname {0:?}")]
    InvalidNick(String),
    #[error("Empty filter")]
    Empty,
}

impl Filter {
    pub fn list_from_config(config: &Config) -> Vec<Self> {
        config
            .filters
            .ignore
            .iter()
            .filter_map(|value| match Filter::try_from_str(value) {
                Ok(filter) => Some(filter),
                Err(error) => {
                    log::warn!("ignoring filter {value:?}: {error}");
                    None
                }
            })
            .collect()
    }

    pub fn try_from_str(value: &str) -> Result<Self, FilterError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(FilterError::Empty);
        }

        let channel_match = CHANNEL_REGEX.find(value).ok().flatten();

        let (class, target) = match channel_match {
            Some(channel_match) => {
                let channel = channel_match.as_str().to_string();
                let target = FilterTarget::user_try_from_str(
                    &value[channel_match.end()..],
                )?;

                (FilterClass::Channel(channel), target)
            }
            None => (FilterClass::Any, FilterTarget::user_try_from_str(value)?),
        };

        Ok(Self { class, target })
    }

    /// Tests a [`Message`] against the filter's predicate.
    ///
    /// This function returns `true` when the message matches predicate, false
    /// otherwise.
    pub fn match_message(&self, message: &Message) -> bool {
        let class_matches = match &self.class {
            FilterClass::Channel(channel) => {
                channel.eq_ignore_ascii_case(&message.channel)
            }
            FilterClass::Any => true,
        };

        let target_matches = match &self.target {
            FilterTarget::User(user) => {
                user.eq_ignore_ascii_case(&message.login_name)
            }
            FilterTarget::Any => true,
        };

        class_matches && target_matches
    }

    pub fn is_user(&self) -> bool {
        matches!(self.target, FilterTarget::User(_))
    }
}

/// Ignore filters as a filter-set: accepts every message no filter matches.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Filter::list_from_config(config))
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn filter_message(&self, message: &Message) -> bool {
        self.filters.iter().any(|f| f.match_message(message))
    }
}

impl FilterSet for FilterChain {
    fn accepts(&self, message: &Message) -> bool {
        !self.filter_message(message)
    }
}
