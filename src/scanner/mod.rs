//! Port scanner - probes every port of a range on one host concurrently.
//!
//! Concurrency is bounded by a semaphore owned by the scanner. The semaphore
//! is shared by every host scan running through the same `PortScanner`, so the
//! ceiling holds for total in-flight probes even when hosts are swept in
//! parallel.

pub mod progress;
pub mod rate_limiter;
pub mod tcp;
pub mod traits;

use crate::types::{HostScan, Port, PortRange};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use progress::{NoProgress, Progress, ProgressCounter};
pub use rate_limiter::RateLimiter;
pub use tcp::TcpConnectProber;
pub use traits::{HostScanner, Prober};

/// Default per-probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default ceiling on concurrent probes. Must stay below the process
/// file-descriptor limit.
pub const DEFAULT_CONCURRENCY: usize = 512;

/// Configuration for a port scanner.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Ports probed on every host.
    pub ports: PortRange,
    /// Per-probe connect timeout.
    pub timeout: Duration,
    /// Maximum number of probes in flight.
    pub concurrency: usize,
    /// Probes per second, 0 for unlimited.
    pub rate_limit: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            ports: PortRange::well_known(),
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            rate_limit: 0,
        }
    }
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the port range.
    pub fn with_ports(mut self, ports: PortRange) -> Self {
        self.ports = ports;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the concurrency ceiling.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the rate limit.
    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

/// Concurrent port scanner over a pluggable prober.
pub struct PortScanner<P = TcpConnectProber> {
    prober: P,
    ports: PortRange,
    concurrency: usize,
    semaphore: Arc<Semaphore>,
    rate_limiter: Option<RateLimiter>,
}

impl PortScanner<TcpConnectProber> {
    /// Create a scanner that probes with TCP connect.
    pub fn new(config: &ScannerConfig) -> Self {
        Self::with_prober(TcpConnectProber::new(config.timeout), config)
    }
}

impl<P: Prober> PortScanner<P> {
    /// Create a scanner over a custom prober. The prober's own timeout wins
    /// over `config.timeout`.
    pub fn with_prober(prober: P, config: &ScannerConfig) -> Self {
        let concurrency = config.concurrency.clamp(1, Semaphore::MAX_PERMITS);

        Self {
            prober,
            ports: config.ports,
            concurrency,
            semaphore: Arc::new(Semaphore::new(concurrency)),
            rate_limiter: RateLimiter::new(config.rate_limit),
        }
    }

    /// The range probed on every host.
    pub fn ports(&self) -> PortRange {
        self.ports
    }

    /// The effective concurrency ceiling.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Probe every port of the range on `address`.
    ///
    /// Ticks `progress` once per completed probe. Once `cancel` fires no new
    /// probe is started; probes already connecting run to completion.
    pub async fn scan(
        &self,
        address: Ipv4Addr,
        progress: &dyn Progress,
        cancel: &CancellationToken,
    ) -> HostScan {
        let start_time = Instant::now();
        let total = self.ports.len();
        progress.start(total as u64);
        debug!(
            %address,
            ports = %self.ports,
            concurrency = self.concurrency,
            timeout_ms = self.prober.timeout().as_millis() as u64,
            "scanning host"
        );

        let open_ports: BTreeSet<Port> = stream::iter(self.ports.iter())
            .map(|port| self.probe_port(address, port, progress, cancel))
            .buffer_unordered(self.concurrency)
            .filter_map(|open| async move { open })
            .collect()
            .await;

        progress.finish();
        debug!(
            %address,
            open = open_ports.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            cancelled = cancel.is_cancelled(),
            "host scan complete"
        );

        HostScan::new(address, open_ports)
    }

    /// Run one probe under a semaphore permit. Returns the port if open.
    async fn probe_port(
        &self,
        address: Ipv4Addr,
        port: Port,
        progress: &dyn Progress,
        cancel: &CancellationToken,
    ) -> Option<Port> {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = self.semaphore.acquire() => permit.ok(),
        };
        let _permit = permit?;

        if let Some(ref limiter) = self.rate_limiter {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return None,
                _ = limiter.wait() => {}
            }
        }
        if cancel.is_cancelled() {
            return None;
        }

        let addr = SocketAddr::new(IpAddr::V4(address), port.as_u16());
        let open = self.prober.probe(addr).await;
        progress.advance();

        open.then_some(port)
    }
}

#[async_trait]
impl<P: Prober> HostScanner for PortScanner<P> {
    async fn scan_host(
        &self,
        address: Ipv4Addr,
        progress: &dyn Progress,
        cancel: &CancellationToken,
    ) -> HostScan {
        self.scan(address, progress, cancel).await
    }
}
