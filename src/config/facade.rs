//! ConfigLoader facade delegating to the merge service.

use super::merge::service::MergeService;
use super::ZettelConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace from every source.
    pub fn load(workspace_root: &Path) -> Result<ZettelConfig, ConfigError> {
        MergeService::load(workspace_root)
    }

    /// Load configuration from one file, with the environment overlay.
    pub fn load_from_file(path: &Path) -> Result<ZettelConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    pub fn default() -> ZettelConfig {
        ZettelConfig::default()
    }
}
