//! Application configuration management.
//!
//! Settings are layered with figment, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory (or an explicit file)
//! 3. `DUPSWEEP_*` environment variables
//!
//! Command-line flags are applied on top by the caller.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::scanner::{
    parse_extension_list, WalkerConfig, DEFAULT_EXCLUDE_MARKERS, DEFAULT_EXTENSIONS,
    PARTIAL_WINDOW,
};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "DUPSWEEP_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file or environment could not be parsed.
    #[error("Invalid configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// The partial window must hold at least one byte.
    #[error("partial_window must be greater than zero")]
    InvalidWindow,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pipe-delimited extension allow-list; empty accepts every file.
    pub extensions: String,
    /// Name fragments excluded from the walk.
    pub exclude_markers: Vec<String>,
    /// Skip names starting with a dot.
    pub skip_hidden: bool,
    /// Partial fingerprint window in bytes.
    pub partial_window: u64,
    /// Run the partial fingerprint filter.
    pub smallhash: bool,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.to_string(),
            exclude_markers: DEFAULT_EXCLUDE_MARKERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            skip_hidden: true,
            partial_window: PARTIAL_WINDOW,
            smallhash: true,
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Load the configuration, reading `path` instead of the default file.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file or environment is malformed or
    /// the resulting values are invalid.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.map(Path::to_path_buf).or_else(Self::config_path);
        let config: Self = Self::figment(file.as_deref())
            .extract()
            .map_err(Box::new)?;
        config.validate()?;

        log::debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// The layered provider chain.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            log::debug!("Reading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupsweep").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Check values that deserialize fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWindow`] for a zero partial window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partial_window == 0 {
            return Err(ConfigError::InvalidWindow);
        }
        Ok(())
    }

    /// Build the walker settings, with `extensions` overriding the configured list.
    #[must_use]
    pub fn walker_config(&self, extensions: Option<&str>) -> WalkerConfig {
        WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            skip_hidden: self.skip_hidden,
            exclude_markers: self.exclude_markers.clone(),
            extensions: parse_extension_list(extensions.unwrap_or(&self.extensions)),
        }
    }
}
