use std::path::PathBuf;

use url::Url;

use crate::config;

/// The sound a highlight asks to play.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sound {
    /// A sound chosen by the highlight source.
    Custom(Url),
    /// Whatever the fallback sound resolves to at playback time.
    Fallback,
}

impl Sound {
    pub fn new(url: Option<&Url>) -> Self {
        url.cloned().map_or(Self::Fallback, Self::Custom)
    }

    /// Where to read the sound from, given the current sound configuration.
    pub fn source(&self, config: &config::Sound) -> Source {
        match self {
            Sound::Custom(url) => match url.to_file_path() {
                Ok(path) => Source::File(path),
                Err(()) => Source::Url(url.clone()),
            },
            Sound::Fallback => config
                .custom_fallback()
                .cloned()
                .map_or(Source::Ping, Source::File),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(Url),
    /// The built-in notification ping.
    Ping,
}
