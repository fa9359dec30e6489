//! Error types for the control point engine.

use thiserror::Error;
use upnp_control_protocol::TransportError;

/// Errors returned while building a control point or invoking an action.
#[derive(Debug, Error)]
pub enum ControlPointError {
    /// The service description is not a usable action list.
    #[error("malformed service description: {0}")]
    MalformedSchema(String),
    /// No action with this name was declared by the service.
    #[error("unknown action: {0}")]
    UnknownAction(String),
    /// Input arguments were not supplied as a map.
    #[error("input arguments must be a map")]
    InvalidArgumentType,
    /// Input arguments contained names the action does not declare.
    #[error("unsupported arguments: {unsupported:?}. Supported args: {supported:?}")]
    UnsupportedArguments {
        unsupported: Vec<String>,
        supported: Vec<String>,
    },
    /// The decoded response body did not have the expected wrapper shape.
    #[error("unexpected response shape ({reason}); body keys: {keys:?}")]
    UnexpectedResponseShape {
        reason: &'static str,
        keys: Vec<String>,
    },
    /// The transport failed; passed through untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
