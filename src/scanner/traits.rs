//! Scanner trait abstractions.
//!
//! `Prober` is the single-port seam and `HostScanner` the single-host seam.
//! Both let the concurrency logic above them be exercised without touching
//! the network.

use crate::scanner::progress::Progress;
use crate::types::HostScan;
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A single bounded-time connection attempt.
///
/// # Example
///
/// ```ignore
/// use lansweep::scanner::{Prober, TcpConnectProber};
///
/// async fn is_open<P: Prober>(prober: &P, addr: SocketAddr) -> bool {
///     prober.probe(addr).await
/// }
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Return true when a connection to `addr` was established.
    ///
    /// Every failure (refused, timeout, unreachable) is `false`. An
    /// implementation must return within its configured timeout.
    async fn probe(&self, addr: SocketAddr) -> bool;

    /// Get the per-probe timeout.
    fn timeout(&self) -> Duration;
}

/// Scans every port of a configured range on one host.
#[async_trait]
pub trait HostScanner: Send + Sync {
    /// Scan `address`, ticking `progress` once per completed probe.
    async fn scan_host(
        &self,
        address: Ipv4Addr,
        progress: &dyn Progress,
        cancel: &CancellationToken,
    ) -> HostScan;
}

#[async_trait]
impl<T: HostScanner + ?Sized> HostScanner for Box<T> {
    async fn scan_host(
        &self,
        address: Ipv4Addr,
        progress: &dyn Progress,
        cancel: &CancellationToken,
    ) -> HostScan {
        (**self).scan_host(address, progress, cancel).await
    }
}
