use std::env;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const APPLICATION_ID: &str = "org.hark.Hark";

pub fn config_dir() -> PathBuf {
    portable_dir().unwrap_or_else(|| {
        dirs_next::config_dir()
            .unwrap_or_else(env::temp_dir)
            .join("hark")
    })
}

pub fn data_dir() -> PathBuf {
    portable_dir().unwrap_or_else(|| {
        dirs_next::data_dir()
            .unwrap_or_else(env::temp_dir)
            .join("hark")
    })
}

/// Checks if a config file exists in the same directory as the executable.
/// If so, it'll use that directory for both config & data dirs.
fn portable_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let dir = exe.parent()?;

    dir.join(CONFIG_FILE_NAME)
        .is_file()
        .then(|| dir.to_path_buf())
}
