//! Error types for config loading and validation.

use thiserror::Error;

/// Errors returned while loading or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a JSON5 document failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged value did not match the config model.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A field failed schema validation; `path` is `layer:dotted.path`.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// A setting needed by the caller is not configured anywhere.
    #[error("missing required setting: {0}")]
    Missing(&'static str),
}
