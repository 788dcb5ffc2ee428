//! Log exporters.
//!
//! - CSV: the aggregate event log, one row per entry, tagged with `eq_id`.
//!   This is the table the map/animation tools read.
//! - JSON: every scenario with its statistics and sensor outcomes.

use crate::runner::{RunConfig, ScenarioResult};
use plum_core::{LogEntry, ProtocolConfig};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column added to every row of the aggregate CSV.
pub const EQ_ID_COLUMN: &str = "eq_id";

/// Writes all scenario logs as one CSV table.
pub fn write_log_csv<W: Write>(writer: W, results: &[ScenarioResult]) -> std::io::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = LogEntry::HEADER.to_vec();
    header.push(EQ_ID_COLUMN);
    csv_writer.write_record(&header)?;

    for result in results {
        for entry in &result.entries {
            let record = entry.to_record();
            csv_writer.write_record(
                record
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(result.report.eq_id.as_str())),
            )?;
        }
    }

    csv_writer.flush()
}

/// Writes the aggregate CSV to a file.
pub fn write_log_csv_file(path: impl AsRef<Path>, results: &[ScenarioResult]) -> std::io::Result<()> {
    let file = File::create(path)?;
    write_log_csv(BufWriter::new(file), results)
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize)]
pub struct SimExport<'a> {
    /// Master seed
    pub seed: u64,

    pub protocol: &'a ProtocolConfig,
    pub run: &'a RunConfig,

    /// All scenarios, in run order
    pub scenarios: &'a [ScenarioResult],
}

impl<'a> SimExport<'a> {
    /// Creates an export view over finished scenarios.
    pub fn new(protocol: &'a ProtocolConfig, run: &'a RunConfig, scenarios: &'a [ScenarioResult]) -> Self {
        Self {
            seed: run.seed,
            protocol,
            run,
            scenarios,
        }
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
