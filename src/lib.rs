//! # lansweep - Local Network Sweeper
//!
//! Sweeps every host of a /24 for open TCP ports and correlates what it
//! finds with known vulnerabilities through pluggable resolvers.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use lansweep::scanner::{NoProgress, PortScanner, ScannerConfig};
//! use lansweep::sweep::HostSweeper;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let prefix = "192.168.1.0/24".parse().unwrap();
//!     let sweeper = HostSweeper::new(PortScanner::new(&ScannerConfig::default()));
//!
//!     let outcome = sweeper
//!         .sweep(prefix, &NoProgress, &NoProgress, &CancellationToken::new())
//!         .await;
//!
//!     for report in &outcome.reports {
//!         println!("Open ports on {}: {}", report.address(), report.ports_display());
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port ranges, network prefixes and host results
//! - [`scanner`] - Concurrent port scanner and the `Prober` trait
//! - [`sweep`] - Host sweeper over a /24
//! - [`lookup`] - Vulnerability and fingerprint resolver traits
//! - [`report`] - Reporting stage that enriches live hosts
//! - [`config`] - Settings file and paths
//! - [`output`] - Plain, JSON and CSV formatting
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod output;
pub mod report;
pub mod scanner;
pub mod services;
pub mod sweep;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, InputError, LookupError};
pub use lookup::{Fingerprinter, VulnerabilityResolver};
pub use report::{EnrichedHost, Reporter};
pub use scanner::{PortScanner, Prober, ScannerConfig};
pub use sweep::{HostSweeper, SweepOutcome};
pub use types::{HostReport, NetworkPrefix, Port, PortRange};
