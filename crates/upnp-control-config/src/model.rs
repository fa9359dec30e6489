//! Configuration schema for the control point.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use upnp_control_protocol::RequestOptions;

/// Root config for a control point.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ControlPointConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

impl ControlPointConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> ControlPointConfigBuilder {
        ControlPointConfigBuilder::default()
    }

    /// Default per-call options derived from the `request` block.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            soap_action: self.request.soap_action.clone(),
            attributes: self.request.attributes.clone(),
            timeout_ms: self.request.timeout_ms,
            headers: self.request.headers.clone(),
        }
    }

    /// Configured service type, or an error naming the missing setting.
    pub fn require_service_type(&self) -> Result<&str, ConfigError> {
        self.service
            .service_type
            .as_deref()
            .ok_or(ConfigError::Missing("service.service_type"))
    }

    /// Configured control URL, or an error naming the missing setting.
    pub fn require_control_url(&self) -> Result<&str, ConfigError> {
        self.service
            .control_url
            .as_deref()
            .ok_or(ConfigError::Missing("service.control_url"))
    }

    /// Configured description location, or an error naming the missing setting.
    pub fn require_description(&self) -> Result<&str, ConfigError> {
        self.service
            .description
            .as_deref()
            .ok_or(ConfigError::Missing("service.description"))
    }
}

/// Builder for assembling a `ControlPointConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct ControlPointConfigBuilder {
    config: ControlPointConfig,
}

impl ControlPointConfigBuilder {
    /// Set the service type URN.
    pub fn service_type(mut self, service_type: impl Into<String>) -> Self {
        self.config.service.service_type = Some(service_type.into());
        self
    }

    /// Set the control URL actions are posted to.
    pub fn control_url(mut self, control_url: impl Into<String>) -> Self {
        self.config.service.control_url = Some(control_url.into());
        self
    }

    /// Set the description location (file path or URL).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.service.description = Some(description.into());
        self
    }

    /// Replace the request defaults.
    pub fn request(mut self, request: RequestConfig) -> Self {
        self.config.request = request;
        self
    }

    /// Finalize and return the built `ControlPointConfig`.
    pub fn build(self) -> ControlPointConfig {
        self.config
    }
}

/// Which service the control point talks to.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Service type URN, e.g. `urn:schemas-upnp-org:service:AVTransport:1`.
    #[serde(default)]
    pub service_type: Option<String>,
    /// Control URL for SOAP calls.
    #[serde(default)]
    pub control_url: Option<String>,
    /// SCPD location: a filesystem path or an http(s) URL.
    #[serde(default)]
    pub description: Option<String>,
}

/// Defaults applied to every outbound call.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RequestConfig {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub soap_action: Option<String>,
    #[serde(default)]
    pub attributes: Option<BTreeMap<String, String>>,
}
