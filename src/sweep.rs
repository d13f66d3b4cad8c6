//! Host sweeper - walks host octets 1-255 under a network prefix.
//!
//! Each host is handed to a `HostScanner`. Hosts run one at a time by
//! default; with a higher host concurrency they overlap, but results are
//! still yielded in ascending host-octet order through an ordered buffer.

use crate::scanner::{HostScanner, Progress};
use crate::types::{HostReport, NetworkPrefix};
use chrono::{DateTime, Utc};
use futures::future;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Result of sweeping one prefix.
#[derive(Debug, Clone, Serialize)]
pub struct SweepOutcome {
    /// The /24 that was swept.
    pub prefix: NetworkPrefix,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Hosts whose scan ran (fully or until cancelled).
    pub hosts_scanned: usize,
    /// True if the sweep stopped early.
    pub cancelled: bool,
    /// Hosts with open ports, ascending by host octet.
    pub reports: Vec<HostReport>,
}

/// Drives a `HostScanner` across a /24.
pub struct HostSweeper<S> {
    scanner: S,
    host_concurrency: usize,
}

impl<S: HostScanner> HostSweeper<S> {
    /// Create a sweeper that scans one host at a time.
    pub fn new(scanner: S) -> Self {
        Self {
            scanner,
            host_concurrency: 1,
        }
    }

    /// Scan up to `n` hosts at once. Values below 1 are treated as 1.
    pub fn with_host_concurrency(mut self, n: usize) -> Self {
        self.host_concurrency = n.max(1);
        self
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    /// Sweep every host under `prefix`.
    pub async fn sweep(
        &self,
        prefix: NetworkPrefix,
        host_progress: &dyn Progress,
        port_progress: &dyn Progress,
        cancel: &CancellationToken,
    ) -> SweepOutcome {
        self.sweep_with(prefix, host_progress, port_progress, cancel, |_| {})
            .await
    }

    /// Sweep every host under `prefix`, calling `on_report` for each live
    /// host as soon as it and every lower host are done.
    ///
    /// `host_progress` ticks once per host (255 for a full sweep).
    /// `port_progress` is handed to the scanner for every host.
    pub async fn sweep_with<F>(
        &self,
        prefix: NetworkPrefix,
        host_progress: &dyn Progress,
        port_progress: &dyn Progress,
        cancel: &CancellationToken,
        mut on_report: F,
    ) -> SweepOutcome
    where
        F: FnMut(&HostReport) + Send,
    {
        let started_at = Utc::now();
        host_progress.start(NetworkPrefix::HOST_COUNT as u64);
        info!(%prefix, host_concurrency = self.host_concurrency, "sweep started");

        let mut scans = stream::iter(prefix.hosts())
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(|address| async move {
                let scan = self.scanner.scan_host(address, port_progress, cancel).await;
                host_progress.advance();
                scan
            })
            .buffered(self.host_concurrency);

        let mut hosts_scanned = 0;
        let mut reports = Vec::new();
        while let Some(scan) = scans.next().await {
            hosts_scanned += 1;
            match HostReport::from_scan(scan) {
                Some(report) => {
                    info!(
                        address = %report.address(),
                        ports = %report.ports_display(),
                        "open ports found"
                    );
                    on_report(&report);
                    reports.push(report);
                }
                None => debug!(hosts_scanned, "no open ports"),
            }
        }

        host_progress.finish();
        let cancelled = cancel.is_cancelled();
        info!(%prefix, hosts_scanned, live = reports.len(), cancelled, "sweep finished");

        SweepOutcome {
            prefix,
            started_at,
            finished_at: Utc::now(),
            hosts_scanned,
            cancelled,
            reports,
        }
    }
}
