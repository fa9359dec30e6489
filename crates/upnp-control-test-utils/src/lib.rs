//! Test helpers shared across upnp-control crates.

pub mod fixtures;
pub mod transport;

pub use fixtures::{AV_TRANSPORT_SCPD, CONTENT_DIRECTORY_SCPD, SINGLE_ARGUMENT_SCPD};
pub use transport::RecordingTransport;
