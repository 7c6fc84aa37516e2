pub mod config;
pub mod logging;

pub mod cache;
pub mod clock;
pub mod handle;
pub mod liveness;
pub mod mime;
pub mod probe;
pub mod provider;
pub mod resolver;

pub use cache::{CacheFileProvider, CacheWriteError, ShareCache};
pub use handle::ResourceHandle;
pub use resolver::{MetadataResolver, ResolvedMetadata};
