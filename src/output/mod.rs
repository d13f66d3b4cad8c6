//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of sweep results.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{
    format_elapsed, open_ports_line, print_elapsed, print_error, print_sweep_header,
    print_warning, write_plain,
};

use crate::cli::OutputFormat;
use crate::report::EnrichedHost;
use crate::sweep::SweepOutcome;
use std::io::{self, Write};

/// Write sweep results to `out` in the given format.
///
/// `findings` is empty when the reporting stage was skipped; formatters then
/// fall back to the bare open-port lists in `outcome`.
pub fn write_results<W: Write>(
    out: &mut W,
    outcome: &SweepOutcome,
    findings: &[EnrichedHost],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::write_plain(out, outcome, findings),
        OutputFormat::Json => json_format::write_json(out, outcome, findings),
        OutputFormat::Csv => csv_format::write_csv(out, outcome, findings),
    }
}

/// Format and print sweep results to stdout.
pub fn format_results(
    outcome: &SweepOutcome,
    findings: &[EnrichedHost],
    format: OutputFormat,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_results(&mut out, outcome, findings, format)?;
    out.flush()
}
