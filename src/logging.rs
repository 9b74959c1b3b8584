//! JSON line-delimited export of computed summaries.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::history::catalog::RegionSummary;

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    file.write_all(b"\n")
}

#[derive(Debug, Serialize)]
pub struct SummaryLogEntry<'a> {
    pub timestamp_ms: u128,
    pub summary: &'a RegionSummary,
}

/// Append one region summary to `<out_dir>/summaries.jsonl`.
///
/// Non-finite statistics appear as JSON `null`, matching their
/// "feature absent" meaning.
pub fn log_region_summary(out_dir: &Path, summary: &RegionSummary) -> io::Result<()> {
    fs::create_dir_all(out_dir)?;
    let entry = SummaryLogEntry {
        timestamp_ms: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
        summary,
    };
    append_json_line(out_dir.join("summaries.jsonl"), &entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, Region};
    use crate::data::{generate_streams, SyntheticConfig};
    use crate::history::catalog::EventCatalog;

    #[test]
    fn summaries_append_as_parseable_json_lines() {
        let out_dir = std::env::temp_dir().join(format!(
            "cytoskeleton_dynamics_log_test_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&out_dir);

        let config = AnalysisConfig::default();
        let streams = generate_streams(&SyntheticConfig::default());
        let summary = EventCatalog::collect(&streams, Region::full(), &config)
            .unwrap()
            .summarize();

        log_region_summary(&out_dir, &summary).unwrap();
        log_region_summary(&out_dir, &summary).unwrap();

        let text = fs::read_to_string(out_dir.join("summaries.jsonl")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["timestamp_ms"].is_number());
            assert_eq!(value["summary"]["region"], "cell");
        }

        fs::remove_dir_all(&out_dir).unwrap();
    }
}
