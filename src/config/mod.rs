//! Configuration loading.
//!
//! Settings are layered: built-in defaults < TOML file < CLI flags. The file is
//! located by `--config`, else the `ALIGN_CONFIG` environment variable (a `.env`
//! file in the working directory is honored), else `align.toml` if present.
//!
//! ```toml
//! [shared]
//! log_level = "info"
//!
//! [defaults]
//! diameter = 675.0
//! length = 1464.0
//!
//! [solver]
//! zero_length = "reject"
//!
//! [plot]
//! size = 21
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

use crate::domain::{DEFAULT_DIAMETER, DEFAULT_LENGTH, LengthPolicy, RunConfig};
use crate::plot::MIN_DIAL_SIZE;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ALIGN_CONFIG";

/// Config file picked up from the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "align.toml";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedConfig {
    pub log_level: LogLevel,
}

/// Form defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub diameter: f64,
    pub length: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            diameter: DEFAULT_DIAMETER,
            length: DEFAULT_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub zero_length: LengthPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Dial height in rows (width is twice that).
    pub size: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self { size: 21 }
    }
}

/// Top-level config file schema. Every section is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub shared: SharedConfig,
    pub defaults: DefaultsConfig,
    pub solver: SolverConfig,
    pub plot: PlotConfig,
}

impl AlignConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - a default diameter or length is not a positive number
    /// - the plot size is below `MIN_DIAL_SIZE`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.defaults.diameter > 0.0 && self.defaults.diameter.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "defaults.diameter must be positive (got {})",
                self.defaults.diameter
            )));
        }
        if !(self.defaults.length > 0.0 && self.defaults.length.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "defaults.length must be positive (got {})",
                self.defaults.length
            )));
        }
        if self.plot.size < MIN_DIAL_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "plot.size must be at least {MIN_DIAL_SIZE} (got {})",
                self.plot.size
            )));
        }
        Ok(())
    }

    /// Run settings before CLI overrides.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            length_policy: self.solver.zero_length,
            default_diameter: self.defaults.diameter,
            default_length: self.defaults.length,
            plot_size: self.plot.size,
        }
    }
}

/// Loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.display().to_string())
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Where the config file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given explicitly (flag or env); must exist.
    Explicit(PathBuf),
    /// The working-directory default; used only if present.
    Implicit(PathBuf),
}

/// Pick the config file: flag, then `ALIGN_CONFIG`, then `align.toml`.
pub fn resolve_config_source(flag: Option<&Path>, env_value: Option<String>) -> ConfigSource {
    if let Some(path) = flag {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    match env_value {
        Some(value) if !value.trim().is_empty() => {
            ConfigSource::Explicit(PathBuf::from(value.trim()))
        }
        _ => ConfigSource::Implicit(PathBuf::from(DEFAULT_CONFIG_FILE)),
    }
}

/// Load and validate the configuration for this process.
pub fn load_config(flag: Option<&Path>) -> Result<AlignConfig, ConfigError> {
    dotenvy::dotenv().ok();
    let source = resolve_config_source(flag, std::env::var(CONFIG_ENV).ok());
    load_from_source(&source)
}

/// Load and validate the configuration from a resolved source.
pub fn load_from_source(source: &ConfigSource) -> Result<AlignConfig, ConfigError> {
    let config = match source {
        ConfigSource::Explicit(path) => AlignConfig::load(path)?,
        ConfigSource::Implicit(path) if path.exists() => AlignConfig::load(path)?,
        ConfigSource::Implicit(_) => AlignConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_form_defaults() {
        let config = AlignConfig::default();
        assert_eq!(config.defaults.diameter, 675.0);
        assert_eq!(config.defaults.length, 1464.0);
        assert_eq!(config.solver.zero_length, LengthPolicy::Reject);
        assert_eq!(config.shared.log_level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config("[solver]\nzero_length = \"propagate\"\n");
        let config = AlignConfig::load(file.path()).unwrap();
        assert_eq!(config.solver.zero_length, LengthPolicy::Propagate);
        assert_eq!(config.defaults.length, 1464.0);
        assert_eq!(config.plot.size, 21);

        let run = config.run_config();
        assert_eq!(run.length_policy, LengthPolicy::Propagate);
    }

    #[test]
    fn full_file_parses() {
        let file = write_config(
            "[shared]\nlog_level = \"debug\"\n\n[defaults]\ndiameter = 400.0\nlength = 900.0\n\n[plot]\nsize = 15\n",
        );
        let config = load_from_source(&ConfigSource::Explicit(file.path().to_path_buf())).unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Debug);
        assert_eq!(config.defaults.diameter, 400.0);
        assert_eq!(config.plot.size, 15);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let file = write_config("[defaults]\nlength = 0.0\n");
        let err = load_from_source(&ConfigSource::Explicit(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)), "{err}");

        let file = write_config("[plot]\nsize = 3\n");
        let err = load_from_source(&ConfigSource::Explicit(file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("plot.size must be at least 9"), "{err}");

        let file = write_config(&format!("[plot]\nsize = {MIN_DIAL_SIZE}\n"));
        assert!(load_from_source(&ConfigSource::Explicit(file.path().to_path_buf())).is_ok());
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let file = write_config("[solver\nzero_length = ");
        let err = AlignConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));

        let file = write_config("[solver]\nzero_length = \"sometimes\"\n");
        assert!(matches!(
            AlignConfig::load(file.path()).unwrap_err(),
            ConfigError::ParseError(_)
        ));
    }

    #[test]
    fn source_resolution_order() {
        let flag = Path::new("from-flag.toml");
        assert_eq!(
            resolve_config_source(Some(flag), Some("from-env.toml".to_string())),
            ConfigSource::Explicit(PathBuf::from("from-flag.toml"))
        );
        assert_eq!(
            resolve_config_source(None, Some("from-env.toml".to_string())),
            ConfigSource::Explicit(PathBuf::from("from-env.toml"))
        );
        assert_eq!(
            resolve_config_source(None, Some("  ".to_string())),
            ConfigSource::Implicit(PathBuf::from(DEFAULT_CONFIG_FILE))
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error_but_implicit_is_not() {
        let missing = PathBuf::from("/definitely/not/here/align.toml");
        assert!(matches!(
            load_from_source(&ConfigSource::Explicit(missing.clone())),
            Err(ConfigError::FileNotFound(_))
        ));
        assert_eq!(
            load_from_source(&ConfigSource::Implicit(missing)).unwrap(),
            AlignConfig::default()
        );
    }
}
