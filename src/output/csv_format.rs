//! CSV output formatting.
//!
//! One row per (address, port, application, vulnerability, severity). OS
//! vulnerabilities use scope "os" and an empty port; a port with nothing
//! known still gets one row with empty vulnerability columns.

use crate::report::EnrichedHost;
use crate::sweep::SweepOutcome;
use std::io::{self, Write};

const HEADER: [&str; 6] = [
    "address",
    "scope",
    "port",
    "application",
    "vulnerability",
    "severity",
];

/// Write results in CSV format.
pub fn write_csv<W: Write>(
    out: &mut W,
    outcome: &SweepOutcome,
    findings: &[EnrichedHost],
) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(HEADER)?;

    if findings.is_empty() {
        for report in &outcome.reports {
            let address = report.address().to_string();
            for port in report.open_ports() {
                let port = port.to_string();
                wtr.write_record([address.as_str(), "port", port.as_str(), "", "", ""])?;
            }
        }
    }

    for host in findings {
        let address = host.address.to_string();
        for vuln in &host.os_vulnerabilities {
            wtr.write_record([
                address.as_str(),
                "os",
                "",
                host.os_display(),
                vuln.id.as_str(),
                vuln.severity.label(),
            ])?;
        }

        for finding in &host.ports {
            let port = finding.port.to_string();
            if finding.vulnerabilities.is_empty() {
                wtr.write_record([
                    address.as_str(),
                    "port",
                    port.as_str(),
                    finding.application.as_str(),
                    "",
                    "",
                ])?;
            }
            for vuln in &finding.vulnerabilities {
                wtr.write_record([
                    address.as_str(),
                    "port",
                    port.as_str(),
                    finding.application.as_str(),
                    vuln.id.as_str(),
                    vuln.severity.label(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
