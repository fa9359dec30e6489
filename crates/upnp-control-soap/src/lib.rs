//! SOAP-over-HTTP collaborators for the control point.
//!
//! [`HttpSoapTransport`] encodes requests into SOAP 1.1 envelopes, posts them
//! to a device control URL, and decodes the response body into nested maps
//! keyed by wire-convention names.

mod decode;
mod envelope;
mod http;

pub use decode::decode_response;
pub use envelope::build_envelope;
pub use http::{HttpSoapTransport, fetch_description};
