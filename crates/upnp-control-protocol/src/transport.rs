//! Transport collaborator interface.

use crate::{SoapRequest, SoapResponse};
use async_trait::async_trait;
use std::fmt::Debug;

/// Errors returned by transports. The engine propagates these unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP exchange itself failed.
    #[error("http error: {0}")]
    Http(String),
    /// The device answered with a non-success status and no SOAP fault.
    #[error("unexpected http status {status}: {body}")]
    Status { status: u16, body: String },
    /// The device answered with a SOAP fault.
    #[error("soap fault {code}: {message}")]
    Fault {
        code: String,
        message: String,
        upnp_error_code: Option<u32>,
        upnp_error_description: Option<String>,
    },
    /// The response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Executes remote action calls on behalf of the control point.
#[async_trait]
pub trait SoapTransport: Send + Sync + Debug {
    /// Perform one call and return the decoded response body.
    async fn call(&self, request: SoapRequest) -> Result<SoapResponse, TransportError>;
}
