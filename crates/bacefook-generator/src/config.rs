//! Configuration loading for the generator binary.
//!
//! Driver settings live in an optional `bacefook-config.yaml`. Every field
//! has a default, so an empty or missing file yields a working setup:
//!
//! ```yaml
//! initial_users: 100
//! follow_up_min_users: 10
//! follow_up_max_users: 19
//! output_dir: "."
//! pretty: true
//! ```
//!
//! The simulation rates themselves are fixed and cannot be configured.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "bacefook-config.yaml";

/// Environment variable overriding [`GeneratorConfig::output_dir`].
pub const OUTPUT_DIR_ENV: &str = "BACEFOOK_OUTPUT_DIR";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but do not make sense together.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Settings for the batch driver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratorConfig {
    /// Users registered by the bootstrap batch.
    #[serde(default = "default_initial_users")]
    pub initial_users: usize,

    /// Smallest number of new users in an interactive follow-up batch.
    #[serde(default = "default_follow_up_min_users")]
    pub follow_up_min_users: usize,

    /// Largest number of new users in an interactive follow-up batch.
    #[serde(default = "default_follow_up_max_users")]
    pub follow_up_max_users: usize,

    /// Directory receiving `bacefook-events-*.json` files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Pretty-print the JSON output.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            initial_users: default_initial_users(),
            follow_up_min_users: default_follow_up_min_users(),
            follow_up_max_users: default_follow_up_max_users(),
            output_dir: default_output_dir(),
            pretty: default_pretty(),
        }
    }
}

const fn default_initial_users() -> usize {
    100
}

const fn default_follow_up_min_users() -> usize {
    10
}

const fn default_follow_up_max_users() -> usize {
    19
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

const fn default_pretty() -> bool {
    true
}

impl GeneratorConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used when present and defaults otherwise. Environment overrides are
    /// applied and the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(explicit) => Self::from_file(explicit)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    tracing::info!("Config file not found, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string. Empty input yields defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply `BACEFOOK_OUTPUT_DIR` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|d| !d.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
    }

    /// Check that the follow-up range is usable.
    ///
    /// `initial_users` is deliberately not checked here: it is validated by
    /// the simulator so that the user sees the same error as for a bad
    /// command-line argument.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.follow_up_min_users == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("follow_up_min_users must be at least 1"),
            });
        }
        if self.follow_up_min_users > self.follow_up_max_users {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "follow_up_min_users ({}) exceeds follow_up_max_users ({})",
                    self.follow_up_min_users, self.follow_up_max_users
                ),
            });
        }
        Ok(())
    }
}
