//! Memoizing decorator around the load pipeline

use healthdash_core::models::LoadResult;
use healthdash_core::ports::{CacheKey, DatasetCache};
use healthdash_core::processing::{load, LoadOptions};

/// Loader that reuses the cached dataset until an explicit reload
///
/// The cache is consulted with the key of the current options, so changing
/// any load parameter yields a miss and a fresh load.
pub struct CachedLoader<C: DatasetCache> {
    options: LoadOptions,
    cache: C,
}

impl<C: DatasetCache> CachedLoader<C> {
    pub fn new(options: LoadOptions, cache: C) -> Self {
        Self { options, cache }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Replace the load parameters; the next access loads again if the key changed
    pub fn set_options(&mut self, options: LoadOptions) {
        self.options = options;
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Cached result for the current options, loading on a miss
    ///
    /// Cache failures are logged and never prevent a dataset from being returned.
    pub fn get_or_load(&mut self) -> LoadResult {
        let key = self.options.cache_key();

        match self.cache.get(&key) {
            Ok(Some(cached)) => {
                tracing::debug!(
                    "Using cached dataset ({}, loaded {})",
                    cached.provenance,
                    cached.loaded_at.to_rfc3339()
                );
                return cached;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Dataset cache unreadable, loading from source: {}", e),
        }

        self.load_and_store(key)
    }

    /// Drop the cached dataset and load again
    pub fn reload(&mut self) -> LoadResult {
        tracing::info!("Reloading dataset from {}", self.options.source_path.display());
        if let Err(e) = self.cache.invalidate() {
            tracing::warn!("Failed to invalidate dataset cache: {}", e);
        }
        self.load_and_store(self.options.cache_key())
    }

    fn load_and_store(&mut self, key: CacheKey) -> LoadResult {
        let result = load(&self.options);
        if let Err(e) = self.cache.put(key, &result) {
            tracing::warn!("Failed to store dataset in cache: {}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::SingleSlotCache;
    use healthdash_core::error::{HealthError, Result};
    use healthdash_core::models::Provenance;

    /// Wraps a cache and counts calls
    #[derive(Default)]
    struct CountingCache {
        inner: SingleSlotCache,
        puts: usize,
        invalidations: usize,
    }

    impl DatasetCache for CountingCache {
        fn get(&self, key: &CacheKey) -> Result<Option<LoadResult>> {
            self.inner.get(key)
        }

        fn put(&mut self, key: CacheKey, result: &LoadResult) -> Result<()> {
            self.puts += 1;
            self.inner.put(key, result)
        }

        fn invalidate(&mut self) -> Result<()> {
            self.invalidations += 1;
            self.inner.invalidate()
        }
    }

    #[test]
    fn test_second_access_is_served_from_cache() {
        let mut loader =
            CachedLoader::new(LoadOptions::new("/nonexistent/who.csv"), CountingCache::default());

        let first = loader.get_or_load();
        let second = loader.get_or_load();

        assert_eq!(first.provenance, Provenance::Fallback);
        assert_eq!(first, second);
        assert_eq!(loader.cache().puts, 1);
    }

    #[test]
    fn test_reload_invalidates_and_loads_again() {
        let mut loader =
            CachedLoader::new(LoadOptions::new("/nonexistent/who.csv"), CountingCache::default());

        let first = loader.get_or_load();
        let reloaded = loader.reload();

        assert_eq!(loader.cache().invalidations, 1);
        assert_eq!(loader.cache().puts, 2);
        assert_eq!(first.dataset, reloaded.dataset);
    }

    #[test]
    fn test_changed_options_miss_the_cache() {
        let mut loader =
            CachedLoader::new(LoadOptions::new("/nonexistent/who.csv"), CountingCache::default());
        let first = loader.get_or_load();

        let mut options = loader.options().clone();
        options.fallback_seed = 7;
        loader.set_options(options);
        let second = loader.get_or_load();

        assert_eq!(loader.cache().puts, 2);
        assert_ne!(first.dataset, second.dataset);
    }

    /// Cache whose every operation fails
    struct BrokenCache;

    impl DatasetCache for BrokenCache {
        fn get(&self, _key: &CacheKey) -> Result<Option<LoadResult>> {
            Err(HealthError::Serialization("unreadable".to_string()))
        }

        fn put(&mut self, _key: CacheKey, _result: &LoadResult) -> Result<()> {
            Err(HealthError::Serialization("unwritable".to_string()))
        }

        fn invalidate(&mut self) -> Result<()> {
            Err(HealthError::Serialization("locked".to_string()))
        }
    }

    #[test]
    fn test_cache_failures_still_return_dataset() {
        let mut loader = CachedLoader::new(LoadOptions::new("/nonexistent/who.csv"), BrokenCache);

        let first = loader.get_or_load();
        assert_eq!(first.provenance, Provenance::Fallback);
        assert!(!first.dataset.is_empty());

        let reloaded = loader.reload();
        assert_eq!(first.dataset, reloaded.dataset);
    }
}
