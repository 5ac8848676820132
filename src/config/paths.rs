//! Config directory resolution.

use std::path::PathBuf;

/// Config home: `$XDG_CONFIG_HOME` when set, else the platform config directory.
pub fn config_home() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Some(PathBuf::from(xdg_config_home));
        }
    }
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

/// `<config home>/zettelgraph/config.toml`
pub fn global_config_path() -> Option<PathBuf> {
    config_home().map(|home| home.join("zettelgraph").join("config.toml"))
}
