//! `coretypes.toml` configuration
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "json"
//! output = "file"
//! directory = "logs"
//!
//! [runtime]
//! expected_version = "0.1.0"
//! strict_version = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::logging::{LogConfig, LogFormat, LogOutput};
use crate::version::VersionTriple;

/// File name looked for by `Config::discover`
pub const CONFIG_FILE_NAME: &str = "coretypes.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub runtime: RuntimeSection,
}

/// Where log output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Stdout,
    #[default]
    Stderr,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: OutputKind,

    /// Directory for `output = "file"`
    #[serde(default = "default_directory")]
    pub directory: String,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub span_events: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSection {
    /// Version of the native core the host was built against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<VersionTriple>,

    /// Report an incompatible native core as an error instead of a warning
    #[serde(default)]
    pub strict_version: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            output: OutputKind::default(),
            directory: default_directory(),
            prefix: default_prefix(),
            span_events: false,
            filter: None,
        }
    }
}

fn default_level() -> String { "info".to_string() }
fn default_directory() -> String { "logs".to_string() }
fn default_prefix() -> String { "coretypes".to_string() }

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(content)
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        config.level()?;
        Ok(config)
    }

    /// Find `coretypes.toml` in `start` or one of its parents
    pub fn find_file(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|path| path.is_file())
    }

    /// Load the nearest `coretypes.toml` above the current directory
    ///
    /// Falls back to the defaults when there is none or it does not parse.
    pub fn discover() -> Self {
        let found = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_file(&dir));

        match found {
            Some(path) => Self::load(&path).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring config file");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Apply `CORETYPES_*` overrides read through `lookup`
    ///
    /// Values that do not parse are skipped with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("CORETYPES_LOG_LEVEL") {
            if level.trim().parse::<Level>().is_ok() {
                self.logging.level = level.trim().to_string();
            } else {
                tracing::warn!(value = %level, "invalid CORETYPES_LOG_LEVEL");
            }
        }

        if let Some(json) = lookup("CORETYPES_LOG_JSON") {
            match parse_bool(&json) {
                Some(true) => self.logging.format = LogFormat::Json,
                Some(false) if self.logging.format == LogFormat::Json => {
                    self.logging.format = LogFormat::Compact;
                }
                Some(false) => {}
                None => tracing::warn!(value = %json, "invalid CORETYPES_LOG_JSON"),
            }
        }

        if let Some(version) = lookup("CORETYPES_EXPECTED_VERSION") {
            match version.parse::<VersionTriple>() {
                Ok(version) => self.runtime.expected_version = Some(version),
                Err(err) => tracing::warn!(value = %version, error = %err, "invalid CORETYPES_EXPECTED_VERSION"),
            }
        }
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    /// The configured log level
    pub fn level(&self) -> Result<Level, String> {
        self.logging
            .level
            .trim()
            .parse()
            .map_err(|_| format!("Invalid log level '{}'", self.logging.level))
    }

    /// Logging section as a `LogConfig`
    pub fn log_config(&self) -> Result<LogConfig, String> {
        let output = match self.logging.output {
            OutputKind::Stdout => LogOutput::Stdout,
            OutputKind::Stderr => LogOutput::Stderr,
            OutputKind::File => LogOutput::File {
                directory: self.logging.directory.clone(),
                prefix: self.logging.prefix.clone(),
            },
        };

        let mut config = LogConfig::new()
            .with_level(self.level()?)
            .with_format(self.logging.format)
            .with_output(output)
            .with_span_events(self.logging.span_events);
        if let Some(filter) = &self.logging.filter {
            config = config.with_filter(filter.clone());
        }
        Ok(config)
    }

    /// Default configuration file content
    pub fn generate_default() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate config"))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config {}: {}", path.display(), e))
    }
}
