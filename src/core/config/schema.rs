//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$PUSHRELAY_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/pushrelay/config.toml`
//! 3. `~/.pushrelay/config.toml`
//!
//! # Repo Config
//!
//! Located at `<git-dir>/pushrelay.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing so that a bad timeout or an
//! unusable permalink template is reported before any ref is processed.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// timeout_secs = 5
/// max_creation_commits = 500
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Per-delivery deadline in seconds
    pub timeout_secs: Option<u64>,

    /// Commit cap for branch-creation walks (0 = unbounded)
    pub max_creation_commits: Option<usize>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout(self.timeout_secs)
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// timeout_secs = 3
///
/// [repository]
/// name = "widgets"
/// url = "https://git.example.com/widgets"
/// owner = "Example Corp"
/// commit_url = "https://git.example.com/widgets/commit/{id}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Per-delivery deadline in seconds (overrides global)
    pub timeout_secs: Option<u64>,

    /// Commit cap for branch-creation walks (overrides global)
    pub max_creation_commits: Option<usize>,

    /// Payload identity overrides
    pub repository: Option<RepositoryConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout(self.timeout_secs)?;

        if let Some(repository) = &self.repository {
            repository.validate()?;
        }

        Ok(())
    }
}

/// Identity fields reported in the payload's `repository` object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Display name
    pub name: Option<String>,

    /// Public URL of the repository
    pub url: Option<String>,

    /// Owner name
    pub owner: Option<String>,

    /// Commit permalink template (`{id}`, `{repository_url}`)
    pub commit_url: Option<String>,
}

impl RepositoryConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "repository.name must not be empty".into(),
                ));
            }
        }

        if let Some(template) = &self.commit_url {
            if !template.contains("{id}") {
                return Err(ConfigError::InvalidValue(format!(
                    "repository.commit_url '{}' must contain the {{id}} placeholder",
                    template
                )));
            }
        }

        Ok(())
    }
}

fn validate_timeout(timeout_secs: Option<u64>) -> Result<(), ConfigError> {
    if timeout_secs == Some(0) {
        return Err(ConfigError::InvalidValue(
            "timeout_secs must be greater than zero".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_parses() {
        let config: GlobalConfig = toml::from_str(
            r#"
            timeout_secs = 5
            max_creation_commits = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.max_creation_commits, Some(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn repo_parses_identity() {
        let config: RepoConfig = toml::from_str(
            r#"
            [repository]
            name = "widgets"
            owner = "Example Corp"
            commit_url = "https://example.com/c/{id}"
            "#,
        )
        .unwrap();
        let repository = config.repository.clone().unwrap();
        assert_eq!(repository.name.as_deref(), Some("widgets"));
        assert_eq!(repository.owner.as_deref(), Some("Example Corp"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_fields_rejected() {
        let parsed: Result<GlobalConfig, _> = toml::from_str("retries = 3");
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = GlobalConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn commit_url_without_placeholder_rejected() {
        let config = RepoConfig {
            repository: Some(RepositoryConfig {
                commit_url: Some("https://example.com/static".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
