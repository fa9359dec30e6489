//! Wire protocol types shared by the control point engine and its transports.

mod naming;
mod transport;

pub use naming::to_wire_name;
pub use transport::{SoapTransport, TransportError};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Ordered mapping of argument name to dynamically typed value.
pub type ArgMap = Map<String, Value>;

/// Namespace attribute bound to the service type on every action element.
pub const SERVICE_NAMESPACE_ATTRIBUTE: &str = "xmlns:u";

/// Caller-supplied overrides layered on top of the derived request attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestOptions {
    /// Replace the derived `SOAPACTION` value.
    #[serde(default)]
    pub soap_action: Option<String>,
    /// Replace the attributes rendered on the action element.
    #[serde(default)]
    pub attributes: Option<BTreeMap<String, String>>,
    /// Request timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Extra HTTP headers sent with the request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Return a copy of these options with `overlay` applied on top.
    pub fn merged_with(&self, overlay: &RequestOptions) -> RequestOptions {
        let mut merged = self.clone();
        if overlay.soap_action.is_some() {
            merged.soap_action = overlay.soap_action.clone();
        }
        if overlay.attributes.is_some() {
            merged.attributes = overlay.attributes.clone();
        }
        if overlay.timeout_ms.is_some() {
            merged.timeout_ms = overlay.timeout_ms;
        }
        for (name, value) in &overlay.headers {
            merged.headers.insert(name.clone(), value.clone());
        }
        merged
    }
}

/// Protocol attributes attached to a single outbound call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestAttributes {
    /// Value of the `SOAPACTION` header.
    pub soap_action: String,
    /// Attributes rendered on the action element.
    pub attributes: BTreeMap<String, String>,
    /// Request timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Extra HTTP headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestAttributes {
    /// Derive the base attributes for `action` on a service of `service_type`.
    pub fn for_action(service_type: &str, action: &str) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            SERVICE_NAMESPACE_ATTRIBUTE.to_string(),
            service_type.to_string(),
        );
        Self {
            soap_action: format!("{service_type}#{action}"),
            attributes,
            timeout_ms: None,
            headers: BTreeMap::new(),
        }
    }

    /// Apply caller options; any option that is set wins over the derived value.
    pub fn apply_options(&mut self, options: &RequestOptions) {
        if let Some(soap_action) = &options.soap_action {
            self.soap_action = soap_action.clone();
        }
        if let Some(attributes) = &options.attributes {
            self.attributes = attributes.clone();
        }
        if options.timeout_ms.is_some() {
            self.timeout_ms = options.timeout_ms;
        }
        for (name, value) in &options.headers {
            self.headers.insert(name.clone(), value.clone());
        }
    }
}

/// A single remote action call handed to the transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoapRequest {
    /// Action name as declared by the service.
    pub action: String,
    /// Protocol attributes for the call.
    pub attributes: RequestAttributes,
    /// Input arguments, keyed exactly as the caller supplied them.
    pub message: ArgMap,
}

/// Decoded response returned by the transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoapResponse {
    /// Decoded SOAP body; normally an object with a single wrapper key.
    pub body: Value,
}

impl SoapResponse {
    /// Wrap a decoded body.
    pub fn new(body: Value) -> Self {
        Self { body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derived_attributes_bind_service_type() {
        let attrs =
            RequestAttributes::for_action("urn:schemas-upnp-org:service:AVTransport:1", "Play");
        assert_eq!(
            attrs.soap_action,
            "urn:schemas-upnp-org:service:AVTransport:1#Play"
        );
        assert_eq!(
            attrs.attributes.get("xmlns:u").map(String::as_str),
            Some("urn:schemas-upnp-org:service:AVTransport:1")
        );
        assert_eq!(attrs.timeout_ms, None);
    }

    #[test]
    fn options_override_derived_attributes() {
        let mut attrs = RequestAttributes::for_action("urn:test", "Stop");
        let options = RequestOptions {
            soap_action: Some("custom#Stop".to_string()),
            attributes: None,
            timeout_ms: Some(250),
            headers: BTreeMap::from([("USER-AGENT".to_string(), "test".to_string())]),
        };
        attrs.apply_options(&options);

        assert_eq!(attrs.soap_action, "custom#Stop");
        assert_eq!(
            attrs.attributes.get("xmlns:u").map(String::as_str),
            Some("urn:test")
        );
        assert_eq!(attrs.timeout_ms, Some(250));
        assert_eq!(attrs.headers.len(), 1);
    }

    #[test]
    fn merged_options_prefer_overlay() {
        let base = RequestOptions {
            timeout_ms: Some(1000),
            headers: BTreeMap::from([
                ("A".to_string(), "base".to_string()),
                ("B".to_string(), "base".to_string()),
            ]),
            ..RequestOptions::default()
        };
        let overlay = RequestOptions {
            timeout_ms: Some(50),
            headers: BTreeMap::from([("B".to_string(), "overlay".to_string())]),
            ..RequestOptions::default()
        };

        let merged = base.merged_with(&overlay);
        assert_eq!(merged.timeout_ms, Some(50));
        assert_eq!(merged.headers.get("A").map(String::as_str), Some("base"));
        assert_eq!(merged.headers.get("B").map(String::as_str), Some("overlay"));
        assert_eq!(merged.soap_action, None);
    }
}
