//! Layered configuration for the launcher agent.
//!
//! Sources, lowest precedence first:
//! - Default values
//! - `autolaunch.toml` next to the executable (or `--config <PATH>`)
//! - Environment variable overrides
//!
//! Running without any configuration watches `<home>/Downloads` for `.nfp`
//! files and logs to `logfile.log` beside the executable.
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `AUTOLAUNCH_` and use double
//! underscores to separate nested levels:
//! - `AUTOLAUNCH_WATCH__EXTENSION=pdf` sets `watch.extension`
//! - `AUTOLAUNCH_WATCH__DIRECTORY=/tmp/incoming` sets `watch.directory`
//! - `AUTOLAUNCH_LOGGING__DEFAULT=debug` sets `logging.default`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default settings file name, looked up beside the executable.
pub const CONFIG_FILE_NAME: &str = "autolaunch.toml";

const ENV_PREFIX: &str = "AUTOLAUNCH_";
const EXTENSION_ENV_KEY: &str = "WATCH__EXTENSION";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    /// Which directory to watch and which files qualify
    #[serde(default)]
    pub watch: WatchConfig,

    /// How qualifying files are opened
    #[serde(default)]
    pub launch: LaunchConfig,

    /// Log sink settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WatchConfig {
    /// Directory to watch (defaults to the user's Downloads folder)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// File extension that triggers a launch, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LaunchConfig {
    /// Program and leading arguments used instead of the platform
    /// default-handler. The file path is appended as the last argument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log file name, created in the executable's directory
    #[serde(default = "default_log_file_name")]
    pub file_name: String,

    /// Default level for all targets
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target level overrides
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_extension() -> String {
    "nfp".to_string()
}
fn default_log_file_name() -> String {
    "logfile.log".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            directory: None,
            extension: default_extension(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_name: default_log_file_name(),
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl WatchConfig {
    /// Configured extension with any leading dot removed.
    pub fn target_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive built from the default level and module overrides.
    pub fn filter_directive(&self) -> String {
        let mut filter_str = self.default.clone();
        for (module, level) in &self.modules {
            filter_str.push_str(&format!(",{module}={level}"));
        }
        filter_str
    }
}

/// `AUTOLAUNCH_WATCH__EXTENSION` taken verbatim, minus optional surrounding quotes.
fn raw_env_extension() -> Option<String> {
    let raw = std::env::var(format!("{ENV_PREFIX}{EXTENSION_ENV_KEY}")).ok()?;
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(&raw);
    Some(unquoted.to_string())
}

impl Settings {
    /// Load configuration from the default location beside the executable.
    ///
    /// A missing settings file is not an error; defaults and environment
    /// variables still apply.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        // Env values are parsed, so `001` would arrive as the integer 1
        if let Some(extension) = raw_env_extension() {
            figment = figment.merge(Serialized::default("watch.extension", extension));
        }

        let settings = figment.extract().map_err(Box::new)?;
        Ok(settings)
    }

    /// `autolaunch.toml` in the executable's directory, if that can be determined.
    pub fn default_config_path() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        Some(exe.parent()?.join(CONFIG_FILE_NAME))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.watch.directory, None);
        assert_eq!(settings.watch.extension, "nfp");
        assert_eq!(settings.launch.command, None);
        assert_eq!(settings.logging.file_name, "logfile.log");
        assert_eq!(settings.logging.default, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from(temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.watch.extension, "nfp");
        assert_eq!(settings.logging.file_name, "logfile.log");
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("autolaunch.toml");

        let toml_content = r#"
[watch]
directory = "/srv/incoming"
extension = "pdf"

[launch]
command = ["evince", "--fullscreen"]

[logging]
file_name = "agent.log"
default = "warn"

[logging.modules]
autolaunch = "debug"
"#;

        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.watch.directory, Some(PathBuf::from("/srv/incoming")));
        assert_eq!(settings.watch.extension, "pdf");
        assert_eq!(
            settings.launch.command,
            Some(vec!["evince".to_string(), "--fullscreen".to_string()])
        );
        assert_eq!(settings.logging.file_name, "agent.log");
        assert_eq!(settings.logging.filter_directive(), "warn,autolaunch=debug");
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("autolaunch.toml");

        fs::write(&config_path, "[watch]\nextension = \"torrent\"\n").unwrap();

        let settings = Settings::load_from(&config_path).unwrap();

        // Modified value
        assert_eq!(settings.watch.extension, "torrent");

        // Defaults still present
        assert_eq!(settings.watch.directory, None);
        assert_eq!(settings.logging.default, "info");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("autolaunch.toml");

        fs::write(&config_path, "[watch\nextension = ").unwrap();

        assert!(matches!(
            Settings::load_from(&config_path),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_target_extension_strips_dot() {
        let mut watch = WatchConfig::default();
        assert_eq!(watch.target_extension(), "nfp");

        watch.extension = ".nfp".to_string();
        assert_eq!(watch.target_extension(), "nfp");
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut settings = Settings::default();
        settings.watch.extension = "pdf".to_string();

        let rendered = settings.to_toml().unwrap();
        assert!(rendered.contains("[watch]"));
        assert!(rendered.contains("extension = \"pdf\""));
        assert!(!rendered.contains("directory"));

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("autolaunch.toml");
        fs::write(&config_path, rendered).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert_eq!(loaded.watch.extension, "pdf");
    }
}
