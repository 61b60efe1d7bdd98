//! Layered application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use crate::{decode::DEFAULT_MAX_BODY_BYTES, error::ConfigError};

/// Directory under the user's config dir that holds `config.toml`.
pub const CONFIG_DIR_NAME: &str = "greenlight";

/// Prefix for environment overrides, e.g. `GREENLIGHT_DECODE__MAX_BODY_BYTES`.
pub const ENV_PREFIX: &str = "GREENLIGHT";

const DEFAULT_CONFIG: &str = r#"# Greenlight configuration.

[decode]
# Largest request body accepted, in bytes.
max_body_bytes = 1048576

[output]
# Indent encoded movies.
pretty = false

[logging]
directory = "logs"
file_name = "movies.log"
"#;

/// Settings for body decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Largest accepted body in bytes.
    pub max_body_bytes: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Settings for encoded output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent encoded movies.
    pub pretty: bool,
}

/// Where the log file is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the log file, created on startup.
    pub directory: PathBuf,
    /// Log file name inside `directory`.
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "movies.log".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Full path of the log file.
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Application configuration assembled from defaults, file and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[decode]` section.
    pub decode: DecodeConfig,
    /// `[output]` section.
    pub output: OutputConfig,
    /// `[logging]` section.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from the default config file, if present, plus the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(default_config_path())
    }

    /// Load from the given file, if present, plus the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.decode.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "decode.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.logging.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "logging.file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Location of `config.toml` under the user's config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join("config.toml")
}

/// Write the default config file when none exists yet.
///
/// Returns the path when a file was written, `None` when one already existed.
pub fn ensure_default_config() -> Result<Option<PathBuf>, ConfigError> {
    let path = default_config_path();
    let written = ensure_default_config_at(&path)?;
    Ok(written.then_some(path))
}

/// Write the default config file to `path` unless something is already there.
///
/// Returns whether a file was written.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }

    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, DEFAULT_CONFIG).map_err(write_err)?;
    Ok(true)
}
