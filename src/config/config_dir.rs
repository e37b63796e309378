use std::path::PathBuf;

use tracing::debug;

use super::error::{ConfigError, ConfigResult};

/// Resolution order: `LEARNBASE_CONFIG` env var, then `./config.toml` when
/// running locally, then the per-user config directory.
pub fn find_config_file(use_local: bool) -> PathBuf {
    if let Some(explicit) = std::env::var_os("LEARNBASE_CONFIG") {
        return PathBuf::from(explicit);
    }

    if use_local {
        return PathBuf::from("./config.toml");
    }

    #[cfg(unix)]
    let base = std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config"));
    #[cfg(windows)]
    let base = std::env::var_os("APPDATA").map(PathBuf::from);

    #[cfg(any(unix, windows))]
    if let Some(base) = base {
        let path = base.join(crate::APPLICATION_NAME).join("config.toml");
        if path.exists() {
            return path;
        }
    }

    PathBuf::from("./config.toml")
}

pub fn read_config(use_local: bool) -> ConfigResult<String> {
    let filename = find_config_file(use_local);

    tracing::trace!("looking for config at: {}", filename.display());
    if !filename.exists() {
        return Err(ConfigError::ConfigNotFound);
    }

    debug!("using {} as configuration file", filename.display());
    Ok(std::fs::read_to_string(filename)?)
}
