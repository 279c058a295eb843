//! JSON cache artifact on disk
//!
//! The artifact stores the cache key next to the load result, so a stale file
//! written for other load parameters is never served.

use healthdash_core::error::{HealthError, Result};
use healthdash_core::models::LoadResult;
use healthdash_core::ports::{CacheKey, DatasetCache};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct ArtifactRef<'a> {
    key: &'a CacheKey,
    result: &'a LoadResult,
}

#[derive(Deserialize)]
struct Artifact {
    key: CacheKey,
    result: LoadResult,
}

/// Cache persisted as a single JSON file
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_artifact(&self) -> Result<Option<Artifact>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache artifact {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(artifact) => Ok(Some(artifact)),
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache artifact {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }
}

impl DatasetCache for FileCache {
    fn get(&self, key: &CacheKey) -> Result<Option<LoadResult>> {
        let Some(artifact) = self.read_artifact()? else {
            return Ok(None);
        };

        if &artifact.key != key {
            tracing::debug!("Cache artifact {} was written for other parameters", self.path.display());
            return Ok(None);
        }

        tracing::debug!("Cache hit: {}", self.path.display());
        Ok(Some(artifact.result))
    }

    fn put(&mut self, key: CacheKey, result: &LoadResult) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Readers never observe a partially written artifact
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, &ArtifactRef { key: &key, result })
                .map_err(|e| HealthError::Serialization(e.to_string()))?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(
            "Wrote cache artifact {} ({} observations)",
            self.path.display(),
            result.dataset.len()
        );
        Ok(())
    }

    fn invalidate(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
