use crate::app_lib::{AppConfig, ConfigOverrides, FileStorage, Storage};
use anyhow::{anyhow, Result};
use std::{path::PathBuf, sync::Arc};

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(overrides: ConfigOverrides) -> Self {
        Self {
            config: AppConfig::default().with_overrides(overrides),
        }
    }

    /// Directory of the persisted session: the configured one, or the per-user
    /// config directory.
    ///
    /// # Errors
    /// Returns an error when neither is available.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        self.config
            .storage_dir
            .clone()
            .or_else(FileStorage::default_dir)
            .ok_or_else(|| anyhow!("no config directory found, pass --storage-dir"))
    }

    /// # Errors
    /// Returns an error when no storage directory can be resolved.
    pub fn storage(&self) -> Result<Arc<dyn Storage>> {
        Ok(Arc::new(FileStorage::new(self.storage_dir()?)))
    }
}
