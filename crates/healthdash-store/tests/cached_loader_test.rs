//! The on-disk cache survives across loader instances

use healthdash_core::models::Provenance;
use healthdash_core::LoadOptions;
use healthdash_store::{CachedLoader, FileCache};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn source() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "COUNTRY,YEAR,GHO (DISPLAY),Numeric").unwrap();
    writeln!(file, "Japan,2000,Life expectancy at birth (years),81.1").unwrap();
    writeln!(file, "Japan,2010,Life expectancy at birth (years),82.9").unwrap();
    file
}

#[test]
fn test_artifact_is_reused_by_a_new_loader() {
    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("dataset.json");
    let file = source();

    let first = CachedLoader::new(LoadOptions::new(file.path()), FileCache::new(&artifact))
        .get_or_load();
    assert_eq!(first.provenance, Provenance::PrimaryWithSynthetic);
    assert!(artifact.exists());

    // The source disappears, but the artifact still matches the request
    let path = file.path().to_path_buf();
    drop(file);

    let second = CachedLoader::new(LoadOptions::new(&path), FileCache::new(&artifact))
        .get_or_load();
    assert_eq!(second.provenance, Provenance::PrimaryWithSynthetic);
    assert_eq!(second.loaded_at, first.loaded_at);
    assert_eq!(second.dataset, first.dataset);
}

#[test]
fn test_reload_rereads_the_source() {
    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("dataset.json");
    let file = source();
    let path = file.path().to_path_buf();

    let mut loader = CachedLoader::new(LoadOptions::new(&path), FileCache::new(&artifact));
    assert_eq!(loader.get_or_load().provenance, Provenance::PrimaryWithSynthetic);

    drop(file);

    let reloaded = loader.reload();
    assert_eq!(reloaded.provenance, Provenance::Fallback);
    assert!(reloaded.fallback_reason.is_some());
}

#[test]
fn test_unusable_artifact_path_still_loads() {
    let dir = TempDir::new().unwrap();
    // A regular file where the artifact's parent directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let artifact = blocker.join("dataset.json");

    let mut loader =
        CachedLoader::new(LoadOptions::new("/nonexistent/who.csv"), FileCache::new(&artifact));

    let result = loader.get_or_load();
    assert_eq!(result.provenance, Provenance::Fallback);
    assert!(!result.dataset.is_empty());
    assert!(!artifact.exists());

    let reloaded = loader.reload();
    assert_eq!(reloaded.dataset, result.dataset);
}
