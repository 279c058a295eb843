//! In-memory cache holding the active dataset version.

use healthdash_core::error::Result;
use healthdash_core::models::LoadResult;
use healthdash_core::ports::{CacheKey, DatasetCache};

/// Cache with exactly one slot
///
/// A `put` replaces whatever was stored, so at most one dataset version is
/// alive at a time.
#[derive(Debug, Clone, Default)]
pub struct SingleSlotCache {
    slot: Option<(CacheKey, LoadResult)>,
}

impl SingleSlotCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the stored entry, if any
    pub fn key(&self) -> Option<&CacheKey> {
        self.slot.as_ref().map(|(key, _)| key)
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

impl DatasetCache for SingleSlotCache {
    fn get(&self, key: &CacheKey) -> Result<Option<LoadResult>> {
        Ok(self
            .slot
            .as_ref()
            .filter(|(stored, _)| stored == key)
            .map(|(_, result)| result.clone()))
    }

    fn put(&mut self, key: CacheKey, result: &LoadResult) -> Result<()> {
        self.slot = Some((key, result.clone()));
        Ok(())
    }

    fn invalidate(&mut self) -> Result<()> {
        self.slot = None;
        Ok(())
    }
}
