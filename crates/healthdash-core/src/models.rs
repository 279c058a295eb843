pub mod catalog;
pub mod dataset;
pub mod observation;
pub mod reference;

pub use catalog::{MetricCatalog, MetricSpec};
pub use dataset::{Dataset, LoadResult, Provenance};
pub use observation::{DataQuality, DevelopmentTier, Observation};
pub use reference::{CountryClass, ReferenceTable};
