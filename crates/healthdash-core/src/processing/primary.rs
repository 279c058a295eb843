//! Primary loader: source table to classified observations

use std::collections::HashSet;
use std::path::Path;

use crate::error::{HealthError, Result};
use crate::formats::SourceReader;
use crate::models::{DataQuality, Observation, ReferenceTable};

/// Read the primary source and attach unit, quality and classification
///
/// Duplicate (country, year, metric) rows keep their first occurrence. A
/// table without any usable row is treated as malformed.
pub fn load_primary(
    reader: &dyn SourceReader,
    path: &Path,
    unit: &str,
    reference: &ReferenceTable,
) -> Result<Vec<Observation>> {
    let table = reader.read(path)?;

    if table.records.is_empty() {
        return Err(HealthError::SourceMalformed {
            path: path.to_path_buf(),
            reason: "Source contains no data rows".to_string(),
        });
    }

    let total = table.records.len();
    let mut seen = HashSet::with_capacity(total);
    let mut observations = Vec::with_capacity(total);

    for record in table.records {
        if !seen.insert((record.country.clone(), record.year, record.metric.clone())) {
            continue;
        }

        observations.push(Observation {
            who_region: reference.region(&record.country).to_string(),
            development_level: reference.tier(&record.country),
            country: record.country,
            year: record.year,
            metric: record.metric,
            value: record.value,
            unit: unit.to_string(),
            data_quality: DataQuality::High,
            value_indexed: None,
        });
    }

    let duplicates = total - observations.len();
    if duplicates > 0 {
        tracing::warn!(
            "Dropped {} duplicate (country, year, metric) rows from {}",
            duplicates,
            table.name
        );
    }

    tracing::info!(
        "Loaded {} primary observations from {} ({} rows filtered out)",
        observations.len(),
        path.display(),
        table.filtered_out
    );

    Ok(observations)
}
