//! Network sweep command.
//!
//! Handles `lansweep [PREFIX]`: sweeps hosts 1-255, announces live hosts as
//! they are found, runs the reporting stage and prints the results.

use super::{OutputFormat, RunConfig};
use crate::error::{CliResult, InputError};
use crate::output;
use crate::report::{EnrichedHost, Reporter};
use crate::scanner::PortScanner;
use crate::sweep::{HostSweeper, SweepOutcome};
use crate::types::NetworkPrefix;
use indicatif::MultiProgress;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::info;

const PROMPT: &str = "Enter an IP address or network prefix to scan (e.g., 10.100.10.0/24): ";

const HOSTS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] Hosts [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)";
const PORTS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] Ports [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)";
const LOOKUP_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] Port vulnerabilities [{bar:40.cyan/blue}] {pos}/{len}";

/// Ask for a prefix on stdin.
pub async fn read_prefix() -> CliResult<String> {
    {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;
    }

    let mut line = String::new();
    let read = BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(InputError::from)?;
    if read == 0 || line.trim().is_empty() {
        return Err(InputError::Empty.into());
    }
    Ok(line.trim().to_string())
}

/// Sweep one /24.
#[derive(Debug)]
pub struct SweepCommand {
    prefix: NetworkPrefix,
}

impl SweepCommand {
    /// Parse the user's prefix. Fails before any scanning.
    pub fn new(input: &str) -> CliResult<Self> {
        let prefix = input.parse::<NetworkPrefix>().map_err(InputError::from)?;
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> NetworkPrefix {
        self.prefix
    }

    /// Execute the sweep command.
    pub async fn execute(&self, run: &RunConfig, cancel: &CancellationToken) -> CliResult<()> {
        if run.show_progress() {
            output::print_sweep_header(self.prefix, run.scanner.ports, run.scanner.timeout);
        }

        let multi = MultiProgress::new();
        let hosts_bar = run.progress_bar(&multi, HOSTS_TEMPLATE);
        let ports_bar = run.progress_bar(&multi, PORTS_TEMPLATE);

        let sweeper = HostSweeper::new(PortScanner::new(&run.scanner))
            .with_host_concurrency(run.host_concurrency);

        let announce = run.output == OutputFormat::Plain;
        let outcome = sweeper
            .sweep_with(self.prefix, &hosts_bar, &ports_bar, cancel, |report| {
                if announce {
                    multi.suspend(|| println!("{}", output::open_ports_line(report)));
                }
            })
            .await;

        hosts_bar.finish_and_clear();
        ports_bar.finish_and_clear();

        if outcome.cancelled {
            output::print_warning("sweep cancelled, showing partial results");
        }

        let findings = enrich(run, &outcome).await;
        output::format_results(&outcome, &findings, run.output)?;
        run.finish();
        Ok(())
    }
}

/// Run the reporting stage unless it was switched off.
pub(crate) async fn enrich(run: &RunConfig, outcome: &SweepOutcome) -> Vec<EnrichedHost> {
    if !run.report || outcome.reports.is_empty() {
        return Vec::new();
    }
    info!(hosts = outcome.reports.len(), "running vulnerability lookups");

    let multi = MultiProgress::new();
    let bar = run.progress_bar(&multi, LOOKUP_TEMPLATE);
    let findings = Reporter::default()
        .enrich_all_with(&outcome.reports, &bar)
        .await;
    bar.finish_and_clear();
    findings
}
