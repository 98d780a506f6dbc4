//! Layered run configuration.
//!
//! Settings are merged from lowest to highest priority:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. A TOML file: `--config <FILE>`, or `config.toml` in the platform
//!    config directory (e.g. `~/.config/dedupe/config.toml`)
//! 3. Environment variables prefixed with `DEDUPE_` (`DEDUPE_EXTENSIONS`,
//!    `DEDUPE_IO_THREADS`, ...)
//! 4. Command-line flags
//!
//! A missing default file is ignored; a missing `--config` file is an error.
//!
//! ```toml
//! extensions = "txt,doc"
//! preferred = "doc"
//! clean = false
//! trash = true
//! delay_secs = 10
//! io_threads = 4
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::scanner::catalog::DEFAULT_IO_THREADS;
use crate::scanner::{Extension, ExtensionSet};

/// Prefix of environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "DEDUPE_";

/// Default countdown before deletion starts.
pub const DEFAULT_DELAY_SECS: u64 = 10;

/// Errors raised while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--config` named a file that does not exist.
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    /// A layer could not be parsed or has a value of the wrong type.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// No layer supplied a usable extension.
    #[error("no file extensions given (use --extensions or set `extensions` in the config file)")]
    NoExtensions,

    /// `io_threads` was set to zero.
    #[error("io_threads must be at least 1")]
    ZeroThreads,

    /// The effective settings could not be rendered as TOML.
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Comma-separated extension list.
    pub extensions: String,
    /// Extension of the copy to keep; empty means no preference.
    pub preferred: String,
    /// Delete duplicates instead of listing them.
    pub clean: bool,
    /// Move deleted files to the trash.
    pub trash: bool,
    /// Countdown before deletion starts.
    pub delay_secs: u64,
    /// Hashing threads.
    pub io_threads: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extensions: String::new(),
            preferred: String::new(),
            clean: false,
            trash: false,
            delay_secs: DEFAULT_DELAY_SECS,
            io_threads: DEFAULT_IO_THREADS,
        }
    }
}

/// The command-line layer: only flags the user actually passed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_threads: Option<usize>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        // Boolean switches can only turn a setting on.
        Self {
            extensions: cli.extensions.clone(),
            preferred: cli.preferred.clone(),
            clean: cli.clean.then_some(true),
            trash: cli.trash.then_some(true),
            delay_secs: cli.delay,
            io_threads: cli.io_threads.map(|n| n as usize),
        }
    }
}

/// `config.toml` in the platform config directory, if one can be determined.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dedupe").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Settings {
    /// Build the figment for the given file and command-line layer.
    ///
    /// `file` is merged only if it exists.
    #[must_use]
    pub fn figment(file: Option<&Path>, overrides: &CliOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = file.filter(|p| p.is_file()) {
            log::debug!("Loading config file: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    /// Resolve the settings for a parsed command line.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FileNotFound`] for a missing `--config` file,
    /// [`ConfigError::Invalid`] for malformed layers.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) if !path.is_file() => return Err(ConfigError::FileNotFound(path.clone())),
            Some(path) => Some(path.clone()),
            None => default_config_path(),
        };
        Self::from_figment(&Self::figment(file.as_deref(), &CliOverrides::from(cli)))
    }

    /// Extract and validate settings from a figment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if extraction fails, [`ConfigError::ZeroThreads`]
    /// if `io_threads` is zero.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let settings: Settings = figment.extract().map_err(Box::new)?;
        if settings.io_threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(settings)
    }

    /// The parsed extension set.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoExtensions`] if the list holds no usable entry.
    pub fn extension_set(&self) -> Result<ExtensionSet, ConfigError> {
        let set = ExtensionSet::parse(&self.extensions);
        if set.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        Ok(set)
    }

    /// The preferred extension, or `None` when unset or blank.
    #[must_use]
    pub fn preferred_extension(&self) -> Option<Extension> {
        Extension::parse(&self.preferred)
    }

    /// Render as TOML (for `--print-config`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
