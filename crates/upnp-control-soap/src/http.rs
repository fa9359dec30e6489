//! reqwest-backed transport and description fetching.

use crate::{build_envelope, decode_response};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use upnp_control_protocol::{RequestAttributes, SoapRequest, SoapResponse, SoapTransport, TransportError};

const SOAP_CONTENT_TYPE: &str = "text/xml; charset=\"utf-8\"";

/// Posts SOAP envelopes to a single device control URL.
#[derive(Debug, Clone)]
pub struct HttpSoapTransport {
    client: Client,
    control_url: String,
}

impl HttpSoapTransport {
    /// Create a transport with a default HTTP client.
    pub fn new(control_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), control_url)
    }

    /// Create a transport sharing an existing HTTP client.
    pub fn with_client(client: Client, control_url: impl Into<String>) -> Self {
        Self {
            client,
            control_url: control_url.into(),
        }
    }

    pub fn control_url(&self) -> &str {
        &self.control_url
    }
}

#[async_trait]
impl SoapTransport for HttpSoapTransport {
    async fn call(&self, request: SoapRequest) -> Result<SoapResponse, TransportError> {
        let envelope = build_envelope(&request);
        debug!(
            "posting soap request (url={}, soap_action={}, bytes={})",
            self.control_url,
            request.attributes.soap_action,
            envelope.len()
        );

        let mut builder = self
            .client
            .post(&self.control_url)
            .headers(request_headers(&request.attributes)?);
        if let Some(timeout_ms) = request.attributes.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        let response = builder
            .body(envelope)
            .send()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;

        if status.is_success() {
            return decode_response(&text).map(SoapResponse::new);
        }
        warn!(
            "soap request failed (url={}, status={})",
            self.control_url, status
        );
        match decode_response(&text) {
            Err(fault @ TransportError::Fault { .. }) => Err(fault),
            _ => Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}

/// Build the header set for one call; option headers replace the derived
/// `Content-Type` and `SOAPACTION` values rather than repeating them.
fn request_headers(attributes: &RequestAttributes) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(SOAP_CONTENT_TYPE));
    headers.insert(
        HeaderName::from_static("soapaction"),
        header_value(&format!("\"{}\"", attributes.soap_action))?,
    );
    for (name, value) in &attributes.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| TransportError::Http(format!("invalid header name {name:?}: {err}")))?;
        headers.insert(name, header_value(value)?);
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value)
        .map_err(|err| TransportError::Http(format!("invalid header value {value:?}: {err}")))
}

/// Fetch a service description document.
pub async fn fetch_description(client: &Client, url: &str) -> Result<String, TransportError> {
    debug!("fetching service description (url={url})");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| TransportError::Http(err.to_string()))?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| TransportError::Http(err.to_string()))?;
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use upnp_control_protocol::RequestOptions;

    #[test]
    fn derived_headers_are_set_once() {
        let attributes = RequestAttributes::for_action("urn:test", "Play");
        let headers = request_headers(&attributes).expect("headers");
        assert_eq!(headers.get_all("soapaction").iter().count(), 1);
        assert_eq!(headers["soapaction"], "\"urn:test#Play\"");
        assert_eq!(headers[CONTENT_TYPE], SOAP_CONTENT_TYPE);
    }

    #[test]
    fn option_headers_replace_derived_ones() {
        let mut attributes = RequestAttributes::for_action("urn:test", "Play");
        attributes.apply_options(&RequestOptions {
            headers: BTreeMap::from([
                ("SOAPACTION".to_string(), "\"urn:other#Play\"".to_string()),
                ("USER-AGENT".to_string(), "upnpctl".to_string()),
            ]),
            ..RequestOptions::default()
        });

        let headers = request_headers(&attributes).expect("headers");
        assert_eq!(headers.get_all("soapaction").iter().count(), 1);
        assert_eq!(headers["soapaction"], "\"urn:other#Play\"");
        assert_eq!(headers["user-agent"], "upnpctl");
    }

    #[test]
    fn invalid_header_name_is_a_transport_error() {
        let mut attributes = RequestAttributes::for_action("urn:test", "Play");
        attributes
            .headers
            .insert("bad header".to_string(), "x".to_string());
        let err = request_headers(&attributes).unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }
}
