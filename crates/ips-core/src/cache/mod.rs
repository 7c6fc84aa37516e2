//! Local share cache.
//!
//! Copies a provider resource byte-for-byte into a flat, process-owned
//! directory under its resolved name and hands back a sharable handle for
//! the copy. Entries with the same name overwrite each other; there is no
//! locking between `cache_file` and `clear_cache`.

mod error;
mod issuer;
mod name;

pub use error::CacheWriteError;
pub use issuer::CacheFileProvider;
pub use name::{cache_safe_name, fallback_name};

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::clock::{Clock, SystemClock};
use crate::config::ShareConfig;
use crate::handle::ResourceHandle;
use crate::resolver::MetadataResolver;

/// Cache store plus the issuer for handles to its entries.
pub struct ShareCache {
    issuer: CacheFileProvider,
    clock: Box<dyn Clock + Send + Sync>,
}

impl ShareCache {
    /// Cache rooted at `dir`, issuing handles under `authority`.
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>, authority: impl Into<String>) -> Self {
        Self {
            issuer: CacheFileProvider::new(authority, dir),
            clock: Box::new(SystemClock),
        }
    }

    pub fn from_config(cfg: &ShareConfig) -> Result<Self> {
        Ok(Self::new(cfg.cache_dir()?, cfg.authority()))
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn dir(&self) -> &Path {
        self.issuer.root()
    }

    /// Provider serving the handles this cache issues.
    pub fn provider(&self) -> &CacheFileProvider {
        &self.issuer
    }

    /// Entry name for `handle`: the resolved name made safe for a flat
    /// directory, or `<epochMillis>.bin` when nothing usable is left.
    pub fn entry_name(&self, resolver: &MetadataResolver<'_>, handle: &ResourceHandle) -> String {
        let resolved = resolver.file_name(handle);
        cache_safe_name(&resolved).unwrap_or_else(|| {
            let name = fallback_name(self.clock.now_millis());
            tracing::debug!(resolved = %resolved, name = %name, "resolved name unusable in cache");
            name
        })
    }

    /// Copy the resource behind `handle` into the cache and return a sharable
    /// handle for the copy.
    ///
    /// The source is opened before anything is written; if it can't be
    /// opened no cache file is created.
    pub fn cache_file(
        &self,
        resolver: &MetadataResolver<'_>,
        handle: &ResourceHandle,
    ) -> Result<ResourceHandle, CacheWriteError> {
        let name = self.entry_name(resolver, handle);

        let mut input = resolver.provider().open_input(handle).map_err(|source| {
            CacheWriteError::SourceUnavailable {
                handle: handle.clone(),
                source,
            }
        })?;

        let path = self.dir().join(&name);
        fs::create_dir_all(self.dir()).map_err(|source| CacheWriteError::Destination {
            path: self.dir().to_path_buf(),
            source,
        })?;
        let mut output = File::create(&path).map_err(|source| CacheWriteError::Destination {
            path: path.clone(),
            source,
        })?;

        let copied = io::copy(&mut input, &mut output)
            .and_then(|n| output.flush().map(|()| n))
            .map_err(|source| CacheWriteError::Copy {
                path: path.clone(),
                source,
            })?;

        let shared = self
            .issuer
            .issue(&name)
            .map_err(|source| CacheWriteError::Issue {
                path: path.clone(),
                source,
            })?;

        tracing::info!(name = %name, bytes = copied, handle = %shared, "cached shared resource");
        Ok(shared)
    }

    /// Delete every cache entry and recreate the empty directory.
    ///
    /// Best effort: failures are logged, never returned.
    pub fn clear_cache(&self) {
        let dir = self.dir();
        match fs::remove_dir_all(dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to clear share cache");
            }
        }
        if let Err(e) = fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to recreate share cache");
        }
    }
}
