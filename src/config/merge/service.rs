//! MergeService: orchestrates sources and deserializes to ZettelConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::ZettelConfig;
use config::{ConfigError, File};
use std::path::Path;
use tracing::debug;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest), global file, workspace file, environment (highest).
    pub fn load(workspace_root: &Path) -> Result<ZettelConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config: ZettelConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %workspace_root.display(),
            ignore_patterns = config.ignore_patterns.len(),
            extensions = ?config.extensions,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load one explicit file with the environment overlay. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<ZettelConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_workspace_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(crate::config::WORKSPACE_CONFIG_FILE),
            "extensions = [\"md\", \"pdf\"]\n\n[watch]\nbatch_window_ms = 10\n",
        )
        .unwrap();

        let config = MergeService::load(dir.path()).unwrap();
        assert_eq!(config.extensions, vec!["md".to_string(), "pdf".to_string()]);
        assert_eq!(config.watch.batch_window_ms, 10);
        assert_eq!(config.watch.debounce_ms, 200);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "ignore_patterns = [\"drafts/**\"]\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = MergeService::load_from_file(&path).unwrap();
        assert_eq!(config.ignore_patterns, vec!["drafts/**".to_string()]);
        assert_eq!(config.logging.level, "debug");
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MergeService::load_from_file(&dir.path().join("absent.toml")).is_err());
    }
}
