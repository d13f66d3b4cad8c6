//! Per-host scan results.

use super::Port;
use serde::Serialize;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;

/// Outcome of probing every port of the scan range on one host.
///
/// The port set may be empty. Iteration order is ascending because of the
/// `BTreeSet`, but only membership is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostScan {
    pub address: Ipv4Addr,
    pub open_ports: BTreeSet<Port>,
}

impl HostScan {
    pub fn new(address: Ipv4Addr, open_ports: BTreeSet<Port>) -> Self {
        Self {
            address,
            open_ports,
        }
    }

    /// Check whether the host accepted at least one connection.
    pub fn is_live(&self) -> bool {
        !self.open_ports.is_empty()
    }
}

/// A host with at least one open port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostReport {
    address: Ipv4Addr,
    open_ports: BTreeSet<Port>,
}

impl HostReport {
    /// Promote a scan to a report. Returns `None` when no port was open.
    pub fn from_scan(scan: HostScan) -> Option<Self> {
        if scan.is_live() {
            Some(Self {
                address: scan.address,
                open_ports: scan.open_ports,
            })
        } else {
            None
        }
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// The open ports; never empty.
    pub fn open_ports(&self) -> &BTreeSet<Port> {
        &self.open_ports
    }

    /// Open ports joined as "22, 80, 443".
    pub fn ports_display(&self) -> String {
        self.open_ports
            .iter()
            .map(Port::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
