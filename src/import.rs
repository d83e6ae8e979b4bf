use std::collections::HashSet;
use std::io;
use std::path::Path;

use anyhow::Context;
use log::{info, warn};

use crate::classify::Thresholds;
use crate::models::Record;

/// Reads records from a CSV file with a header row naming the [`Record`] fields.
pub fn read_records(csv_path: &Path) -> anyhow::Result<Vec<Record>> {
    let reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let records = collect(reader)
        .with_context(|| format!("failed to read records from {}", csv_path.display()))?;
    info!("loaded {} records from {}", records.len(), csv_path.display());
    Ok(records)
}

/// Same as [`read_records`] for any reader.
pub fn read_records_from<R: io::Read>(source: R) -> anyhow::Result<Vec<Record>> {
    collect(csv::Reader::from_reader(source))
}

fn collect<R: io::Read>(mut reader: csv::Reader<R>) -> anyhow::Result<Vec<Record>> {
    let thresholds = Thresholds::default();
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<Record>().enumerate() {
        // Header is line 1.
        let record = result.with_context(|| format!("invalid record on line {}", index + 2))?;

        if !seen.insert(record.student_id.clone()) {
            warn!("duplicate student id {}", record.student_id);
        }
        // Inconsistent records are kept as supplied; the pipeline never re-derives them.
        if !thresholds.is_consistent(&record) {
            warn!(
                "record {} has risk/standing fields that disagree with its score or GPA",
                record.student_id
            );
        }
        records.push(record);
    }

    Ok(records)
}
