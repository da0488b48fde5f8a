use std::fmt;

use super::Tags;

/// A chat badge: the badge set name and its version, e.g. `subscriber/12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Badge {
    pub name: String,
    pub version: String,
}

impl Badge {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Badges listed in the `badges` tag. Entries that aren't exactly
/// `name/version` are skipped.
pub fn parse(tags: &Tags) -> Vec<Badge> {
    let Some(badges) = tags.get("badges") else {
        return vec![];
    };

    badges
        .split(',')
        .filter(|badge| !badge.is_empty())
        .filter_map(|badge| {
            let mut parts = badge.split('/');

            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(version), None) => {
                    Some(Badge::new(name, version))
                }
                _ => None,
            }
        })
        .collect()
}
