//! Rule engine configuration.
//!
//! Configuration is plain data deserialized from TOML. Every field has a
//! default, so an empty file yields a standard 8x8 board with king-only
//! safety filtering.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use chess_core::MAX_EXTENT;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Board extent outside `1..=MAX_EXTENT`.
    #[error("Invalid board extent {width}x{height}")]
    InvalidExtent { width: i32, height: i32 },
}

/// Which candidate moves are checked against the mover's own king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KingSafety {
    /// Only king destinations are filtered through the attack tracker.
    /// Moves by other pieces that uncover the king are not rejected.
    #[default]
    KingMovesOnly,
    /// Every candidate is played on a scratch board and dropped if the
    /// mover's king is attacked afterwards. Requires a king on the board.
    Strict,
}

/// Rule engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Number of files. Defaults to 8.
    #[serde(default = "default_extent")]
    pub width: i32,
    /// Number of ranks. Defaults to 8.
    #[serde(default = "default_extent")]
    pub height: i32,
    /// King-safety filtering mode.
    #[serde(default)]
    pub king_safety: KingSafety,
}

fn default_extent() -> i32 {
    8
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            width: default_extent(),
            height: default_extent(),
            king_safety: KingSafety::default(),
        }
    }
}

impl RuleConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] for invalid TOML, or
    /// [`ConfigError::InvalidExtent`] for an unsupported board size.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks the board extent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = 1..=MAX_EXTENT;
        if valid.contains(&self.width) && valid.contains(&self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidExtent {
                width: self.width,
                height: self.height,
            })
        }
    }
}
