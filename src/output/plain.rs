//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::report::EnrichedHost;
use crate::sweep::SweepOutcome;
use crate::types::{HostReport, NetworkPrefix, PortRange};
use console::{style, Style};
use std::io::{self, Write};
use std::time::Duration;

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// The line announced as soon as a live host is found.
pub fn open_ports_line(report: &HostReport) -> String {
    format!(
        "Open ports on {}: {}",
        report.address(),
        report.ports_display()
    )
}

/// Write the full sweep summary.
pub fn write_plain<W: Write>(
    out: &mut W,
    outcome: &SweepOutcome,
    findings: &[EnrichedHost],
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                    {} Sweep Results",
        style("lansweep").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Network:").bold(), outcome.prefix)?;
    let seconds = (outcome.finished_at - outcome.started_at).num_milliseconds() as f64 / 1000.0;
    writeln!(
        out,
        "  {} {} hosts scanned in {:.2}s, {} with open ports",
        style("Statistics:").bold(),
        outcome.hosts_scanned,
        seconds,
        style(outcome.reports.len()).green().bold()
    )?;
    if outcome.cancelled {
        writeln!(
            out,
            "  {}",
            style("Sweep cancelled, results are partial.").yellow()
        )?;
    }
    writeln!(out)?;

    if outcome.reports.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else if findings.is_empty() {
        for report in &outcome.reports {
            writeln!(out, "  {}", open_ports_line(report))?;
        }
    } else {
        for host in findings {
            write_host(out, host)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;
    Ok(())
}

fn write_host<W: Write>(out: &mut W, host: &EnrichedHost) -> io::Result<()> {
    writeln!(
        out,
        "  {} {}",
        style("IP Address:").bold(),
        style(host.address).white().bold()
    )?;
    writeln!(out, "  {} {}", style("Operating System:").bold(), host.os_display())?;

    if !host.os_vulnerabilities.is_empty() {
        writeln!(out, "  {}", style("OS vulnerabilities:").bold())?;
        for vuln in &host.os_vulnerabilities {
            writeln!(
                out,
                "    {:<18} {}",
                vuln.id,
                severity_style(vuln.severity.label()).apply_to(&vuln.severity)
            )?;
        }
    }

    writeln!(out, "  {}", style(THIN_RULE).dim())?;
    writeln!(
        out,
        "  {:>6}  {:<15}  {}",
        style("PORT").bold(),
        style("APPLICATION").bold(),
        style("VULNERABILITIES").bold()
    )?;
    writeln!(out, "  {}", style(THIN_RULE).dim())?;

    for finding in &host.ports {
        let vulns = if finding.vulnerabilities.is_empty() {
            style("none".to_string()).dim().to_string()
        } else {
            finding
                .vulnerabilities
                .iter()
                .map(|v| {
                    format!(
                        "{} ({})",
                        v.id,
                        severity_style(v.severity.label()).apply_to(&v.severity)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(
            out,
            "  {:>6}  {:<15}  {}",
            finding.port, finding.application, vulns
        )?;
    }
    writeln!(out, "  {}", style(THIN_RULE).dim())?;

    for error in &host.lookup_errors {
        writeln!(out, "  {} {}", style("Lookup failed:").yellow().bold(), error)?;
    }
    writeln!(out)?;
    Ok(())
}

fn severity_style(label: &str) -> Style {
    match label {
        "Critical" => Style::new().red().bold(),
        "High" => Style::new().red(),
        "Medium" => Style::new().yellow(),
        "Low" => Style::new().green(),
        _ => Style::new().dim(),
    }
}

/// Print a sweep header before scanning begins.
pub fn print_sweep_header(prefix: NetworkPrefix, ports: PortRange, timeout: Duration) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("lansweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "{} Network: {}",
        style("•").dim(),
        style(prefix).white().bold()
    );
    eprintln!(
        "{} Scanning {} ports per host ({}ms timeout)...",
        style("•").dim(),
        style(ports.len()).white().bold(),
        timeout.as_millis()
    );
    eprintln!();
}

/// Render a duration as `H:MM:SS.ffffff`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_micros()
    )
}

/// Print the total run time.
pub fn print_elapsed(elapsed: Duration) {
    println!("Time to complete operation: {}", format_elapsed(elapsed));
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
