use anyhow::{Context, Result};
use healthdash_core::config::LayeredConfig;
use healthdash_core::models::LoadResult;
use healthdash_core::ports::DatasetCache;
use healthdash_core::LoadOptions;
use healthdash_store::{CachedLoader, FileCache, SingleSlotCache};
use tracing::debug;

pub type Loader = CachedLoader<Box<dyn DatasetCache>>;

/// Build the cached loader for the resolved configuration
///
/// A configured cache path selects the on-disk artifact; otherwise the
/// dataset is only cached in memory for the lifetime of the process.
pub fn open_loader(config: &LayeredConfig) -> Result<Loader> {
    let options = LoadOptions::from_config(config)
        .context("Failed to load reference data. Check the reference and catalog files")?;

    let cache: Box<dyn DatasetCache> = match &config.cache_path.value {
        Some(path) => {
            debug!(path = %path.display(), "Using file cache");
            Box::new(FileCache::new(path))
        }
        None => Box::new(SingleSlotCache::new()),
    };

    Ok(CachedLoader::new(options, cache))
}

/// Current dataset, loading again first when `reload` is set
pub fn dataset(loader: &mut Loader, reload: bool) -> LoadResult {
    if reload {
        loader.reload()
    } else {
        loader.get_or_load()
    }
}
