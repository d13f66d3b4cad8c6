//! JSON output formatting.

use crate::report::EnrichedHost;
use crate::sweep::SweepOutcome;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct SweepDocument<'a> {
    #[serde(flatten)]
    outcome: &'a SweepOutcome,
    findings: &'a [EnrichedHost],
}

/// Write the whole sweep as one pretty-printed JSON document.
pub fn write_json<W: Write>(
    out: &mut W,
    outcome: &SweepOutcome,
    findings: &[EnrichedHost],
) -> io::Result<()> {
    let document = SweepDocument { outcome, findings };
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    #[test]
    fn test_json_document() {
        let mut buf = Vec::new();
        write_json(&mut buf, &fixtures::outcome(), &fixtures::findings()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["prefix"], "10.0.0.0/24");
        assert_eq!(value["hosts_scanned"], 255);
        assert_eq!(value["reports"][0]["address"], "10.0.0.7");
        assert_eq!(value["reports"][0]["open_ports"], serde_json::json!([22, 80]));
        assert_eq!(value["findings"][0]["os"], serde_json::Value::Null);
        assert_eq!(value["findings"][0]["ports"][1]["application"], "http");
        assert_eq!(
            value["findings"][0]["ports"][1]["vulnerabilities"][0]["severity"],
            "Medium"
        );
    }
}
