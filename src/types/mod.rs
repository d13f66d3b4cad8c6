//! Core type definitions using newtype patterns for type safety.
//!
//! These types make invalid states unrepresentable: a `Port` is never zero,
//! a `NetworkPrefix` always has three octets, and a `HostReport` always holds
//! at least one open port.

mod host;
mod port;
mod prefix;

pub use host::{HostReport, HostScan};
pub use port::{Port, PortError, PortRange};
pub use prefix::{NetworkPrefix, PrefixError};
