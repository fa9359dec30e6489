//! Public SDK surface for upnp-control.
//!
//! This crate re-exports the building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use upnp_control_config as config;
pub use upnp_control_core as core;
/// Re-export for convenience.
pub use upnp_control_protocol as protocol;
/// Re-export for convenience.
pub use upnp_control_soap as soap;

pub use upnp_control_core::{ActionSignature, ControlPointError, DeviceControlPoint};
pub use upnp_control_soap::HttpSoapTransport;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
