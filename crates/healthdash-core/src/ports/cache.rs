use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::formats::SourceLayout;
use crate::models::LoadResult;

/// Identity of a load request
///
/// Two requests with equal keys produce the same dataset, so a cached
/// `LoadResult` can be reused for either of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub source_path: PathBuf,
    pub layout: SourceLayout,
    pub primary_unit: String,
    pub seed: u64,
    pub fallback_seed: u64,
    pub reference_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

/// Port for caching the active dataset
pub trait DatasetCache {
    /// Cached result for the key, if any
    fn get(&self, key: &CacheKey) -> Result<Option<LoadResult>>;

    /// Store a result, replacing whatever the cache held before
    fn put(&mut self, key: CacheKey, result: &LoadResult) -> Result<()>;

    /// Drop the cached result
    fn invalidate(&mut self) -> Result<()>;
}

impl<C: DatasetCache + ?Sized> DatasetCache for Box<C> {
    fn get(&self, key: &CacheKey) -> Result<Option<LoadResult>> {
        (**self).get(key)
    }

    fn put(&mut self, key: CacheKey, result: &LoadResult) -> Result<()> {
        (**self).put(key, result)
    }

    fn invalidate(&mut self) -> Result<()> {
        (**self).invalidate()
    }
}
