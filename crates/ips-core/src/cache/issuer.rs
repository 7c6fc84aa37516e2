//! Sharable handles for cached files.
//!
//! Issued handles look like `content://<authority>/cache/<name>`. The same
//! type serves them back as a [`ContentProvider`], so a cached entry can be
//! re-resolved and re-read like any other resource.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use url::Url;

use crate::handle::ResourceHandle;
use crate::mime::{extension_of, BuiltinMimeRegistry, MimeRegistry};
use crate::provider::{
    AssetDescriptor, Cell, ContentProvider, Rows, DISPLAY_NAME, SIZE, UNKNOWN_LENGTH,
};

const SCHEME: &str = "content";
const ROOT_SEGMENT: &str = "cache";

/// Issues and serves handles for files directly inside the cache directory.
#[derive(Debug, Clone)]
pub struct CacheFileProvider {
    authority: String,
    root: PathBuf,
}

impl CacheFileProvider {
    pub fn new(authority: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            authority: authority.into(),
            root: root.into(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Handle for the cache entry called `name`.
    pub fn issue(&self, name: &str) -> Result<ResourceHandle, url::ParseError> {
        let mut url = Url::parse(&format!("{SCHEME}://{}/", self.authority))?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(ROOT_SEGMENT)
            .push(name);
        Ok(ResourceHandle::from_url(url))
    }

    /// Local path behind a handle this provider issued.
    ///
    /// `None` for other authorities, other layouts, or names that would leave
    /// the cache directory.
    pub fn path_for(&self, handle: &ResourceHandle) -> Option<PathBuf> {
        if handle.as_url().scheme() != SCHEME || handle.authority() != Some(self.authority.as_str())
        {
            return None;
        }
        match handle.path_segments().as_slice() {
            [root, name] if root == ROOT_SEGMENT => {
                if name.contains('/') || name.contains('\0') || name == "." || name == ".." {
                    return None;
                }
                Some(self.root.join(name))
            }
            _ => None,
        }
    }

    fn existing_path(&self, handle: &ResourceHandle) -> io::Result<PathBuf> {
        self.path_for(handle).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{handle} is not a cache entry of {}", self.authority),
            )
        })
    }
}

impl ContentProvider for CacheFileProvider {
    fn query(&self, handle: &ResourceHandle, projection: &[&str]) -> anyhow::Result<Option<Rows>> {
        let Some(path) = self.path_for(handle) else {
            return Ok(None);
        };
        let meta = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());

        let mut columns = Vec::new();
        let mut row = Vec::new();
        for column in projection {
            match *column {
                DISPLAY_NAME => row.push(Cell::from(name.clone())),
                SIZE => row.push(Cell::Integer(i64::try_from(meta.len())?)),
                _ => continue,
            }
            columns.push(*column);
        }
        Ok(Some(Rows::new(columns).with_row(row)))
    }

    fn media_type(&self, handle: &ResourceHandle) -> Option<String> {
        let path = self.path_for(handle).filter(|p| p.is_file())?;
        let name = path.file_name()?.to_string_lossy().into_owned();
        BuiltinMimeRegistry
            .mime_for_extension(extension_of(&name))
            .map(str::to_string)
    }

    fn open_input(&self, handle: &ResourceHandle) -> io::Result<Box<dyn Read>> {
        let path = self.existing_path(handle)?;
        Ok(Box::new(File::open(path)?))
    }

    fn open_asset_descriptor(
        &self,
        handle: &ResourceHandle,
    ) -> io::Result<Option<AssetDescriptor>> {
        let path = self.existing_path(handle)?;
        Ok(Some(AssetDescriptor::new(File::open(path)?, UNKNOWN_LENGTH)))
    }
}
