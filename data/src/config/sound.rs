use std::path::PathBuf;

use serde::Deserialize;

/// The sound played by highlight sources without a custom sound of their own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Sound {
    pub use_custom_fallback: bool,
    pub custom_fallback: Option<PathBuf>,
}

impl Sound {
    /// The custom fallback file, if enabled and present on disk.
    pub fn custom_fallback(&self) -> Option<&PathBuf> {
        self.custom_fallback
            .as_ref()
            .filter(|_| self.use_custom_fallback)
            .filter(|path| path.is_file())
    }
}
