//! Single host command.
//!
//! Handles `lansweep host <ADDRESS>`: scans one address with the same port
//! scanner and reporting stage as a sweep.

use super::sweep::enrich;
use super::RunConfig;
use crate::error::{CliResult, InputError};
use crate::output;
use crate::scanner::PortScanner;
use crate::sweep::SweepOutcome;
use crate::types::{HostReport, NetworkPrefix};
use chrono::Utc;
use clap::Parser;
use indicatif::MultiProgress;
use std::net::Ipv4Addr;
use tokio_util::sync::CancellationToken;

const PORTS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Scan every port of the range on one host.
#[derive(Parser, Debug)]
pub struct HostCommand {
    /// IPv4 address to scan
    #[arg(value_name = "ADDRESS")]
    pub address: String,
}

impl HostCommand {
    /// Parse the target address.
    pub fn target(&self) -> CliResult<Ipv4Addr> {
        self.address
            .trim()
            .parse()
            .map_err(|_| InputError::Address(self.address.clone()).into())
    }
}

/// Scan one already-validated address and print the results.
pub async fn run_host(
    address: Ipv4Addr,
    run: &RunConfig,
    cancel: &CancellationToken,
) -> CliResult<()> {
    let multi = MultiProgress::new();
    let bar = run.progress_bar(&multi, PORTS_TEMPLATE);
    bar.set_message(address.to_string());

    let started_at = Utc::now();
    let scanner = PortScanner::new(&run.scanner);
    let scan = scanner.scan(address, &bar, cancel).await;
    bar.finish_and_clear();

    let outcome = SweepOutcome {
        prefix: NetworkPrefix::from(address),
        started_at,
        finished_at: Utc::now(),
        hosts_scanned: 1,
        cancelled: cancel.is_cancelled(),
        reports: HostReport::from_scan(scan).into_iter().collect(),
    };

    let findings = enrich(run, &outcome).await;
    output::format_results(&outcome, &findings, run.output)?;
    run.finish();
    Ok(())
}
