//! Error type for cache materialization.

use std::io;
use std::path::PathBuf;

use crate::handle::ResourceHandle;

/// Failure to materialize a resource into the cache store.
#[derive(Debug, thiserror::Error)]
pub enum CacheWriteError {
    /// The source stream could not be opened. Nothing was written.
    #[error("cannot open source stream for {handle}")]
    SourceUnavailable {
        handle: ResourceHandle,
        #[source]
        source: io::Error,
    },
    /// The destination file (or the cache directory) could not be created.
    #[error("cannot create cache file {}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading the source or writing the destination failed mid-copy.
    #[error("copy into {} failed", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The cached file could not be wrapped in a sharable handle.
    #[error("cannot issue handle for {}", path.display())]
    Issue {
        path: PathBuf,
        #[source]
        source: url::ParseError,
    },
}
