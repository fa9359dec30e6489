//! Control point engine: action schema discovery and action invocation.
//!
//! A [`DeviceControlPoint`] is built from a service description document and
//! a [`SoapTransport`](upnp_control_protocol::SoapTransport). Every action the
//! description declares becomes invocable by name through
//! [`DeviceControlPoint::invoke`].

pub mod control_point;
pub mod error;
pub mod schema;
pub mod table;

pub use control_point::DeviceControlPoint;
pub use error::ControlPointError;
pub use schema::{ActionSignature, parse_action_list};
pub use table::ActionTable;
