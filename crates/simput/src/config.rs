// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Loader and manual configuration.
//!
//! Supports both programmatic and file-based configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What a motion dispatcher does with the `dummy` discriminator, which
/// selects no concrete motion kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DispatchPolicy {
    /// Produce a no-op placeholder and log a warning.
    #[default]
    Lenient,

    /// Fail with `UnsupportedKind`.
    Strict,
}

/// Output markup of the generated manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ManualFormat {
    #[default]
    Latex,
    Xml,
}

/// Manual generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualConfig {
    /// Markup to emit.
    #[serde(default)]
    pub format: ManualFormat,

    /// Depth at which to stop descending into fields.
    #[serde(default)]
    pub stop_level: Option<usize>,

    /// Emit cross-referenced sections for labeled nodes.
    #[serde(default)]
    pub cross_ref: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimputConfig {
    /// Discriminator fallback policy.
    #[serde(default)]
    pub dispatch: DispatchPolicy,

    /// Manual settings.
    #[serde(default)]
    pub manual: ManualConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Default for SimputConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchPolicy::Lenient,
            manual: ManualConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl SimputConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Unknown log level '{}' (expected one of {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        if self.manual.stop_level == Some(0) {
            return Err(ConfigError::Invalid(
                "manual.stop_level must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Use strict discriminator dispatch.
    pub fn strict(mut self) -> Self {
        self.dispatch = DispatchPolicy::Strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = SimputConfig::parse("").expect("empty config is valid");
        assert_eq!(config.dispatch, DispatchPolicy::Lenient);
        assert_eq!(config.manual.format, ManualFormat::Latex);
        assert_eq!(config.manual.stop_level, None);
        assert!(!config.manual.cross_ref);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_all_fields() {
        let config = SimputConfig::parse(
            r#"
dispatch = "strict"
log_level = "debug"

[manual]
format = "xml"
stop_level = 2
cross_ref = true
"#,
        )
        .expect("valid config");
        assert_eq!(config.dispatch, DispatchPolicy::Strict);
        assert_eq!(config.manual.format, ManualFormat::Xml);
        assert_eq!(config.manual.stop_level, Some(2));
        assert!(config.manual.cross_ref);
    }

    #[test]
    fn test_validation() {
        let mut config = SimputConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.log_level = "WARN".into();
        config.manual.stop_level = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(matches!(
            SimputConfig::parse("dispatch = \"sloppy\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "dispatch = \"strict\"").expect("write");

        let config = SimputConfig::from_file(file.path()).expect("load");
        assert_eq!(config.dispatch, DispatchPolicy::Strict);

        assert!(matches!(
            SimputConfig::from_file("/nonexistent/simput.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = SimputConfig::default().strict();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        assert!(toml_str.contains("dispatch = \"strict\""));
        assert!(toml_str.contains("format = \"latex\""));
    }
}
