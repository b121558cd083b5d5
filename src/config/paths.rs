//! XDG path resolution for codeagent configuration and cache directories.

use anyhow::Result;
use std::path::PathBuf;

use super::types::Config;

impl Config {
    /// Returns the platform-specific configuration directory for codeagent.
    ///
    /// Returns `~/.config/codeagent/` on Linux (`XDG_CONFIG_HOME/codeagent`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the platform-specific cache directory for codeagent.
    ///
    /// Returns `~/.cache/codeagent/` on Linux (`XDG_CACHE_HOME/codeagent`).
    /// Used for storing readline history.
    pub fn cache_dir() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the full path to the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(crate::constants::CONFIG_FILENAME))
    }

    /// Returns the full path to the readline history file.
    pub fn history_path() -> Result<PathBuf> {
        Ok(Self::cache_dir()?.join(crate::constants::HISTORY_FILENAME))
    }
}
