//! Reporting stage.
//!
//! Enriches each live host with OS and application names and the
//! vulnerabilities the resolvers know about. A failed lookup is logged,
//! recorded on the host, and the next lookup runs anyway.

use crate::error::LookupError;
use crate::lookup::{
    Fingerprinter, LookupQuery, PlaceholderResolver, ServiceTableFingerprinter,
    VulnerabilityResolver, Vulnerability,
};
use crate::scanner::{NoProgress, Progress};
use crate::types::{HostReport, Port};
use serde::Serialize;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, warn};

/// What is known about one open port.
#[derive(Debug, Clone, Serialize)]
pub struct PortFinding {
    pub port: Port,
    pub application: String,
    pub vulnerabilities: Vec<Vulnerability>,
}

/// A live host after the reporting stage.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedHost {
    pub address: Ipv4Addr,
    /// `None` when the fingerprinter could not tell.
    pub os: Option<String>,
    pub os_vulnerabilities: Vec<Vulnerability>,
    /// One entry per open port, ascending.
    pub ports: Vec<PortFinding>,
    /// Display text of every lookup that failed for this host.
    pub lookup_errors: Vec<String>,
}

impl EnrichedHost {
    /// OS name for display.
    pub fn os_display(&self) -> &str {
        self.os.as_deref().unwrap_or("unknown")
    }

    pub fn has_errors(&self) -> bool {
        !self.lookup_errors.is_empty()
    }
}

/// Runs the lookups for each live host.
#[derive(Clone)]
pub struct Reporter {
    resolver: Arc<dyn VulnerabilityResolver>,
    fingerprinter: Arc<dyn Fingerprinter>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(
            Arc::new(PlaceholderResolver),
            Arc::new(ServiceTableFingerprinter),
        )
    }
}

impl Reporter {
    pub fn new(
        resolver: Arc<dyn VulnerabilityResolver>,
        fingerprinter: Arc<dyn Fingerprinter>,
    ) -> Self {
        Self {
            resolver,
            fingerprinter,
        }
    }

    /// Enrich a single host. Never fails.
    pub async fn enrich(&self, report: &HostReport) -> EnrichedHost {
        self.enrich_with(report, &NoProgress).await
    }

    /// Enrich a single host, ticking `progress` once per open port.
    pub async fn enrich_with(&self, report: &HostReport, progress: &dyn Progress) -> EnrichedHost {
        let address = report.address();
        let mut errors = Vec::new();

        let os_vulnerabilities = self
            .vulnerabilities(LookupQuery::Os(address), &mut errors)
            .await;

        let os = match self.fingerprinter.operating_system(address).await {
            Ok(os) => os,
            Err(e) => {
                record(&mut errors, e);
                None
            }
        };

        let mut ports = Vec::with_capacity(report.open_ports().len());
        for &port in report.open_ports() {
            let vulnerabilities = self
                .vulnerabilities(LookupQuery::Port(port), &mut errors)
                .await;

            let application = match self.fingerprinter.application(address, port).await {
                Ok(name) => name,
                Err(e) => {
                    record(&mut errors, e);
                    "unknown".to_string()
                }
            };

            ports.push(PortFinding {
                port,
                application,
                vulnerabilities,
            });
            progress.advance();
        }

        debug!(%address, ports = ports.len(), failures = errors.len(), "host enriched");

        EnrichedHost {
            address,
            os,
            os_vulnerabilities,
            ports,
            lookup_errors: errors,
        }
    }

    /// Enrich every host, keeping input order.
    pub async fn enrich_all(&self, reports: &[HostReport]) -> Vec<EnrichedHost> {
        self.enrich_all_with(reports, &NoProgress).await
    }

    /// Enrich every host. `progress` is started with the total number of
    /// open ports and ticks once per port looked up.
    pub async fn enrich_all_with(
        &self,
        reports: &[HostReport],
        progress: &dyn Progress,
    ) -> Vec<EnrichedHost> {
        let total: usize = reports.iter().map(|r| r.open_ports().len()).sum();
        progress.start(total as u64);

        let mut enriched = Vec::with_capacity(reports.len());
        for report in reports {
            enriched.push(self.enrich_with(report, progress).await);
        }

        progress.finish();
        enriched
    }

    async fn vulnerabilities(
        &self,
        query: LookupQuery,
        errors: &mut Vec<String>,
    ) -> Vec<Vulnerability> {
        match self.resolver.lookup(&query).await {
            Ok(found) => found,
            Err(e) => {
                record(errors, e);
                Vec::new()
            }
        }
    }
}

fn record(errors: &mut Vec<String>, error: LookupError) {
    warn!(%error, "lookup failed, continuing");
    errors.push(error.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupResult;
    use crate::lookup::Severity;
    use crate::scanner::ProgressCounter;
    use crate::types::HostScan;
    use async_trait::async_trait;
    use std::collections::BTreeSet;

    /// Fails every port lookup for port 22, answers everything else.
    struct FlakyResolver;

    #[async_trait]
    impl VulnerabilityResolver for FlakyResolver {
        async fn lookup(&self, query: &LookupQuery) -> LookupResult<Vec<Vulnerability>> {
            match query {
                LookupQuery::Port(port) if port.as_u16() == 22 => Err(query.failed("feed offline")),
                _ => Ok(vec![Vulnerability::new("CVE-0000-0001", Severity::High)]),
            }
        }
    }

    struct BrokenFingerprinter;

    #[async_trait]
    impl Fingerprinter for BrokenFingerprinter {
        async fn operating_system(&self, _address: Ipv4Addr) -> LookupResult<Option<String>> {
            Err(LookupError::Unavailable("OS"))
        }

        async fn application(&self, _address: Ipv4Addr, _port: Port) -> LookupResult<String> {
            Ok("custom".to_string())
        }
    }

    fn report(host: u8, ports: &[u16]) -> HostReport {
        let ports: BTreeSet<Port> = ports.iter().filter_map(|&p| Port::new(p)).collect();
        HostReport::from_scan(HostScan::new(Ipv4Addr::new(10, 0, 0, host), ports)).unwrap()
    }

    #[tokio::test]
    async fn test_default_reporter() {
        let enriched = Reporter::default().enrich(&report(5, &[80, 22])).await;

        assert_eq!(enriched.address, Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(enriched.os_display(), "unknown");
        assert_eq!(enriched.os_vulnerabilities.len(), 2);
        assert_eq!(enriched.os_vulnerabilities[0].severity, Severity::Critical);

        let apps: Vec<_> = enriched.ports.iter().map(|p| p.application.as_str()).collect();
        assert_eq!(apps, vec!["ssh", "http"]);
        assert!(enriched.ports.iter().all(|p| p.vulnerabilities.len() == 2));
        assert!(!enriched.has_errors());
    }

    #[tokio::test]
    async fn test_failing_lookups_are_recorded_and_skipped() {
        let reporter = Reporter::new(Arc::new(FlakyResolver), Arc::new(BrokenFingerprinter));
        let enriched = reporter.enrich(&report(9, &[22, 443])).await;

        assert_eq!(enriched.os, None);
        assert_eq!(enriched.os_vulnerabilities.len(), 1);
        assert_eq!(enriched.ports.len(), 2);
        assert!(enriched.ports[0].vulnerabilities.is_empty());
        assert_eq!(enriched.ports[1].vulnerabilities.len(), 1);
        assert_eq!(enriched.ports[1].application, "custom");
        assert_eq!(
            enriched.lookup_errors,
            vec![
                "OS lookup backend unavailable".to_string(),
                "Port lookup for 22 failed: feed offline".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_enrich_all_keeps_order() {
        let reports = vec![report(1, &[80]), report(7, &[443]), report(200, &[22])];
        let enriched = Reporter::default().enrich_all(&reports).await;
        let hosts: Vec<u8> = enriched.iter().map(|e| e.address.octets()[3]).collect();
        assert_eq!(hosts, vec![1, 7, 200]);
    }

    #[tokio::test]
    async fn test_progress_ticks_once_per_open_port() {
        let reports = vec![report(1, &[22, 80, 443]), report(2, &[8080])];
        let progress = ProgressCounter::new();
        let reporter = Reporter::new(Arc::new(FlakyResolver), Arc::new(BrokenFingerprinter));

        let enriched = reporter.enrich_all_with(&reports, &progress).await;

        assert_eq!(enriched.len(), 2);
        assert_eq!(progress.starts(), 1);
        assert_eq!(progress.total(), 4);
        assert_eq!(progress.completed(), 4);
    }
}
