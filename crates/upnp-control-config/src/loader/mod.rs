//! Layered configuration loader.
//!
//! Discovers configuration layers (user, cwd, runtime), validates each against
//! the schema, merges them in precedence order, and produces a final
//! `ControlPointConfig`.

mod layer_io;
mod merge;
mod schema;


use crate::{ConfigError, ControlPointConfig};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "upnp-control.json5";
/// Default config directory under the user's home.
const DEFAULT_CONFIG_DIR: &str = ".upnp-control";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: ControlPointConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration.
    User,
    /// Current working directory configuration.
    Cwd,
    /// Runtime overrides (highest precedence).
    Runtime,
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory searched for a local config file.
    pub cwd: PathBuf,
    /// Optional user config path (defaults to `~/.upnp-control/upnp-control.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied last, in order.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
        }
    }

    /// Add a runtime override config path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl ControlPointConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        schema::validate_layer_schema(&value, "config")?;
        config_from_value(value)
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations.
    ///
    /// Layer precedence (low -> high): user, cwd, runtime overrides.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut loaded = Vec::new();

        if let Some(layer) = layer_io::load_optional_layer(
            ConfigLayerSource::User,
            options.user_config_path.as_deref(),
        )? {
            loaded.push(layer);
        }

        let cwd_path = options.cwd.join(DEFAULT_CONFIG_FILE);
        let cwd_is_user = options
            .user_config_path
            .as_deref()
            .is_some_and(|user| layer_io::same_file(user, &cwd_path));
        if cwd_is_user {
            debug!("skipping duplicate layer (path={})", cwd_path.display());
        } else if let Some(layer) =
            layer_io::load_optional_layer(ConfigLayerSource::Cwd, Some(&cwd_path))?
        {
            loaded.push(layer);
        }

        for runtime_path in &options.runtime_paths {
            loaded.push(layer_io::load_required_layer(
                ConfigLayerSource::Runtime,
                runtime_path,
            )?);
        }

        let mut merged = Value::Object(serde_json::Map::new());
        let mut layers = Vec::with_capacity(loaded.len());
        for layer in loaded {
            merge::merge_json_values(&mut merged, &layer.value);
            layers.push(layer.meta);
        }

        let config = config_from_value(merged)?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidField {
                path: "request.timeout_ms".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }
        if let Some(url) = &self.service.control_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidField {
                    path: "service.control_url".to_string(),
                    message: format!("expected an http(s) URL, got {url}"),
                });
            }
        }
        Ok(())
    }
}

/// Internal representation of a loaded config layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value) -> Result<ControlPointConfig, ConfigError> {
    let config: ControlPointConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
