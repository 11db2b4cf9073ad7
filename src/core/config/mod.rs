//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! pushrelay has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Per-repository overrides, stored next to the object store
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$PUSHRELAY_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/pushrelay/config.toml`
//! 3. `~/.pushrelay/config.toml`
//!
//! # Repo Config Location
//!
//! `<git-dir>/pushrelay.toml`. For a bare repository the git dir is the
//! repository itself, so the file sits beside `hooks/`.
//!
//! # Example
//!
//! ```no_run
//! use pushrelay::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/srv/git/widgets.git"))).unwrap();
//! println!("timeout: {:?}", config.timeout());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, RepoConfig, RepositoryConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Default per-delivery deadline.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default commit cap for branch-creation walks.
pub const DEFAULT_MAX_CREATION_COMMITS: usize = 1000;

/// File name of the repository-scoped config inside the git dir.
pub const REPO_CONFIG_FILE: &str = "pushrelay.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules automatically. Repo config overrides
/// global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if present)
    pub repo: Option<RepoConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads the repo-scoped config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or fail
    /// validation. Missing config files are not an error.
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let (global, global_path) = Self::load_global()?;

        let (repo, repo_path) = match git_dir {
            Some(dir) => Self::load_repo(dir)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path,
        })
    }

    /// Load global configuration from standard locations.
    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $PUSHRELAY_CONFIG
        if let Ok(path) = std::env::var("PUSHRELAY_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/pushrelay/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("pushrelay/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.pushrelay/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".pushrelay/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    /// Load repository configuration from the git dir.
    fn load_repo(git_dir: &Path) -> Result<(Option<RepoConfig>, Option<PathBuf>), ConfigError> {
        let path = git_dir.join(REPO_CONFIG_FILE);
        if !path.exists() {
            return Ok((None, None));
        }

        let config = Self::read_toml(&path)?;
        Ok((Some(config), Some(path)))
    }

    /// Read and parse a TOML config file.
    fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Per-delivery deadline.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .repo
            .as_ref()
            .and_then(|r| r.timeout_secs)
            .or(self.global.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Commit cap for branch-creation walks. `None` means unbounded.
    pub fn max_creation_commits(&self) -> Option<usize> {
        let cap = self
            .repo
            .as_ref()
            .and_then(|r| r.max_creation_commits)
            .or(self.global.max_creation_commits)
            .unwrap_or(DEFAULT_MAX_CREATION_COMMITS);
        (cap > 0).then_some(cap)
    }

    /// Repository identity overrides, if configured.
    pub fn repository(&self) -> RepositoryConfig {
        self.repo
            .as_ref()
            .and_then(|r| r.repository.clone())
            .unwrap_or_default()
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_path(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
