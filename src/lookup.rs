//! Pluggable resolvers for vulnerability, OS and application data.
//!
//! The crate ships no real backend. `PlaceholderResolver` returns a fixed
//! list per category and `ServiceTableFingerprinter` names applications
//! from the well-known service table. A real feed implements the same
//! traits and is handed to the `Reporter` instead.

use crate::error::{LookupError, LookupResult};
use crate::services::get_service_description;
use crate::types::Port;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;

/// Severity rating attached to a vulnerability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    /// A label the feed used that is not one of the above.
    Unknown(String),
}

impl Severity {
    /// Map a feed label to a severity, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" | "moderate" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown(label) => label,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A known vulnerability: identifier plus rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vulnerability {
    pub id: String,
    pub severity: Severity,
}

impl Vulnerability {
    pub fn new(id: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            severity,
        }
    }
}

/// What a vulnerability lookup is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupQuery {
    /// Vulnerabilities of whatever OS runs at an address.
    Os(Ipv4Addr),
    /// Vulnerabilities of whatever service listens on a port.
    Port(Port),
}

impl LookupQuery {
    /// The category discriminator, "OS" or "Port".
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Os(_) => "OS",
            Self::Port(_) => "Port",
        }
    }

    /// The identifier part of the query as text.
    pub fn identifier(&self) -> String {
        match self {
            Self::Os(addr) => addr.to_string(),
            Self::Port(port) => port.to_string(),
        }
    }

    /// Build a `LookupError::Failed` for this query.
    pub fn failed(&self, reason: impl Into<String>) -> LookupError {
        LookupError::Failed {
            category: self.category(),
            identifier: self.identifier(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category(), self.identifier())
    }
}

/// Source of known vulnerabilities.
#[async_trait]
pub trait VulnerabilityResolver: Send + Sync {
    /// Return the vulnerabilities known for `query`. No freshness or
    /// completeness guarantee.
    async fn lookup(&self, query: &LookupQuery) -> LookupResult<Vec<Vulnerability>>;
}

/// Source of OS and application names.
#[async_trait]
pub trait Fingerprinter: Send + Sync {
    /// Name of the operating system at `address`, if it can be told.
    async fn operating_system(&self, address: Ipv4Addr) -> LookupResult<Option<String>>;

    /// Name of the application listening on `port`.
    async fn application(&self, address: Ipv4Addr, port: Port) -> LookupResult<String>;
}

/// Fixed vulnerability lists, one per category. Stands in for a real feed.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderResolver;

impl PlaceholderResolver {
    const OS: &'static [(&'static str, Severity)] = &[
        ("CVE-2021-1234", Severity::Critical),
        ("CVE-2021-5678", Severity::High),
    ];

    const PORT: &'static [(&'static str, Severity)] = &[
        ("CVE-2022-4321", Severity::Medium),
        ("CVE-2022-8765", Severity::Low),
    ];
}

#[async_trait]
impl VulnerabilityResolver for PlaceholderResolver {
    async fn lookup(&self, query: &LookupQuery) -> LookupResult<Vec<Vulnerability>> {
        let entries = match query {
            LookupQuery::Os(_) => Self::OS,
            LookupQuery::Port(_) => Self::PORT,
        };
        Ok(entries
            .iter()
            .map(|(id, severity)| Vulnerability::new(*id, severity.clone()))
            .collect())
    }
}

/// Names applications from the well-known service table. Never identifies
/// the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServiceTableFingerprinter;

#[async_trait]
impl Fingerprinter for ServiceTableFingerprinter {
    async fn operating_system(&self, _address: Ipv4Addr) -> LookupResult<Option<String>> {
        Ok(None)
    }

    async fn application(&self, _address: Ipv4Addr, port: Port) -> LookupResult<String> {
        Ok(get_service_description(port.as_u16()).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_category() {
        let os = LookupQuery::Os(Ipv4Addr::new(10, 0, 0, 1));
        let port = LookupQuery::Port(Port::new(22).unwrap());
        assert_eq!(os.category(), "OS");
        assert_eq!(port.category(), "Port");
        assert_eq!(os.to_string(), "OS:10.0.0.1");
        assert_eq!(port.to_string(), "Port:22");
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::from_label("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::from_label(" moderate "), Severity::Medium);
        assert_eq!(
            Severity::from_label("Informational"),
            Severity::Unknown("Informational".to_string())
        );
        assert_eq!(Severity::High.to_string(), "High");
        assert_eq!(serde_json::to_string(&Severity::Low).unwrap(), "\"Low\"");
    }

    #[test]
    fn test_placeholder_lists() {
        let resolver = PlaceholderResolver;

        let os = tokio_test::block_on(resolver.lookup(&LookupQuery::Os(Ipv4Addr::LOCALHOST)))
            .unwrap();
        assert_eq!(
            os,
            vec![
                Vulnerability::new("CVE-2021-1234", Severity::Critical),
                Vulnerability::new("CVE-2021-5678", Severity::High),
            ]
        );

        let port = tokio_test::block_on(resolver.lookup(&LookupQuery::Port(Port::new(80).unwrap())))
            .unwrap();
        assert_eq!(port.len(), 2);
        assert_eq!(port[0].id, "CVE-2022-4321");
        assert_eq!(port[1].severity, Severity::Low);
    }

    #[tokio::test]
    async fn test_service_table_fingerprinter() {
        let fp = ServiceTableFingerprinter;
        let addr = Ipv4Addr::new(10, 0, 0, 1);
        assert_eq!(fp.operating_system(addr).await.unwrap(), None);
        assert_eq!(fp.application(addr, Port::new(22).unwrap()).await.unwrap(), "ssh");
        assert_eq!(fp.application(addr, Port::new(1000).unwrap()).await.unwrap(), "unknown");
    }
}
