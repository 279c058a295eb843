//! Load pipeline
//!
//! Primary loader, then synthetic augmentation and indexing. Any source
//! failure switches to the fallback generator, so `load` always returns a
//! usable dataset together with its provenance.

pub mod fallback;
pub mod indexing;
pub mod primary;
pub mod synthetic;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::LayeredConfig;
use crate::error::Result;
use crate::formats::{CsvSourceReader, SourceLayout, SourceReader};
use crate::models::{Dataset, LoadResult, MetricCatalog, Observation, ReferenceTable};
use crate::ports::CacheKey;

pub use fallback::generate_fallback;
pub use indexing::compute_indexed;
pub use primary::load_primary;
pub use synthetic::SyntheticGenerator;

/// Everything a load request depends on
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub source_path: PathBuf,
    pub layout: SourceLayout,
    /// Unit attached to every primary observation
    pub primary_unit: String,
    pub seed: u64,
    pub fallback_seed: u64,
    pub reference: ReferenceTable,
    pub catalog: MetricCatalog,
    /// File the reference table came from, if any
    pub reference_path: Option<PathBuf>,
    /// File the catalog came from, if any
    pub catalog_path: Option<PathBuf>,
}

impl LoadOptions {
    /// Options for a source file with built-in reference data and defaults
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            layout: SourceLayout::default(),
            primary_unit: "years".to_string(),
            seed: crate::config::DEFAULT_SEED,
            fallback_seed: crate::config::DEFAULT_SEED,
            reference: ReferenceTable::builtin(),
            catalog: MetricCatalog::builtin(),
            reference_path: None,
            catalog_path: None,
        }
    }

    /// Resolve options from layered configuration, reading reference files
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let reference = match &config.reference_path.value {
            Some(path) => ReferenceTable::load_from_file(path)?,
            None => ReferenceTable::builtin(),
        };

        let catalog = match &config.catalog_path.value {
            Some(path) => MetricCatalog::load_from_file(path)?,
            None => MetricCatalog::builtin(),
        };

        Ok(Self {
            source_path: config.source_path.value.clone(),
            layout: SourceLayout {
                delimiter: config.delimiter.value,
                encoding: config.encoding.value,
                columns: config.columns.value.clone(),
                row_filter: config.row_filter.value.clone(),
            },
            primary_unit: config.primary_unit.value.clone(),
            seed: config.seed.value,
            fallback_seed: config.fallback_seed.value,
            reference,
            catalog,
            reference_path: config.reference_path.value.clone(),
            catalog_path: config.catalog_path.value.clone(),
        })
    }

    /// Cache identity of this request
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            source_path: self.source_path.clone(),
            layout: self.layout.clone(),
            primary_unit: self.primary_unit.clone(),
            seed: self.seed,
            fallback_seed: self.fallback_seed,
            reference_path: self.reference_path.clone(),
            catalog_path: self.catalog_path.clone(),
        }
    }
}

/// Load the dataset from the configured delimited source
pub fn load(options: &LoadOptions) -> LoadResult {
    let reader = CsvSourceReader::new(options.layout.clone());
    load_with_reader(&reader, options)
}

/// Load the dataset with a specific source reader, falling back on failure
pub fn load_with_reader(reader: &dyn SourceReader, options: &LoadOptions) -> LoadResult {
    match load_primary_with_synthetic(reader, options) {
        Ok(dataset) => {
            tracing::info!(
                "Dataset ready: {} observations, {} metrics",
                dataset.len(),
                dataset.metrics().len()
            );
            LoadResult::primary(dataset)
        }
        Err(e) => {
            if e.is_source_error() {
                tracing::warn!("Primary source failed, using fallback dataset: {}", e);
            } else {
                tracing::error!("Unexpected load failure, using fallback dataset: {}", e);
            }
            let dataset = generate_fallback(options.fallback_seed, &options.reference);
            LoadResult::fallback(dataset, e.to_string())
        }
    }
}

/// Primary rows merged with synthetic metrics for the same countries, then indexed
pub fn load_primary_with_synthetic(
    reader: &dyn SourceReader,
    options: &LoadOptions,
) -> Result<Dataset> {
    let primary = load_primary(
        reader,
        &options.source_path,
        &options.primary_unit,
        &options.reference,
    )?;

    let synthetic = augment(&primary, options);
    Ok(merge_and_index(primary, synthetic))
}

/// Synthetic rows for every country in `primary`, skipping metrics it already supplies
pub fn augment(primary: &[Observation], options: &LoadOptions) -> Vec<Observation> {
    let mut seen = HashSet::new();
    let countries: Vec<String> = primary
        .iter()
        .filter(|o| seen.insert(o.country.as_str()))
        .map(|o| o.country.clone())
        .collect();

    let mut exclude: HashSet<String> = primary.iter().map(|o| o.metric.clone()).collect();
    // The catalog's own life-expectancy entry stands in for the primary indicator
    exclude.insert(crate::models::catalog::LIFE_EXPECTANCY.to_string());

    SyntheticGenerator::new(&options.catalog, &options.reference, options.seed)
        .generate(&countries, &exclude)
}

/// Concatenate primary and synthetic rows and compute the index series
pub fn merge_and_index(primary: Vec<Observation>, synthetic: Vec<Observation>) -> Dataset {
    let mut rows = primary;
    rows.extend(synthetic);
    Dataset::new(compute_indexed(rows))
}
