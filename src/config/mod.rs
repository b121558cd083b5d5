//! Configuration types and path resolution for codeagent.
//!
//! Settings live as TOML at the platform's XDG config path
//! (e.g. `~/.config/codeagent/config.toml` on Linux), optionally overridden by
//! a `codeagent.toml` in the project. Readline history goes under the XDG
//! cache directory (`~/.cache/codeagent/`).

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::Config;

use anyhow::Result;
use std::path::Path;

impl Config {
    /// Load config with precedence: project > global > defaults.
    /// Creates default config file if none exists.
    ///
    /// The project file is searched from `start_dir` upwards.
    pub fn load(start_dir: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project(start_dir)?;

        let mut config = global;
        if let Some(proj) = project {
            config = Self::merge(config, proj);
        }

        config.resolve_substitutions();
        Ok(config)
    }
}
