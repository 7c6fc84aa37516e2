//! In-memory content provider for integration tests.
//!
//! Each registered resource may carry any subset of metadata; missing pieces
//! behave like a provider that doesn't know them.

use std::collections::HashMap;
use std::io::{self, Read, Write};

use ips_core::handle::ResourceHandle;
use ips_core::provider::{
    AssetDescriptor, Cell, ContentProvider, DocumentLookup, Rows, DISPLAY_NAME, SIZE,
    UNKNOWN_LENGTH,
};

#[derive(Debug, Clone, Default)]
pub struct Resource {
    pub display_name: Option<String>,
    pub declared_size: Option<i64>,
    pub mime: Option<String>,
    pub bytes: Option<Vec<u8>>,
    /// Expose an asset descriptor (with unknown declared length) over `bytes`.
    pub descriptor: bool,
    pub document_name: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryProvider {
    resources: HashMap<String, Resource>,
}

impl MemoryProvider {
    pub fn insert(&mut self, handle: &str, resource: Resource) -> ResourceHandle {
        self.resources.insert(handle.to_string(), resource);
        ResourceHandle::parse(handle).unwrap()
    }

    fn get(&self, handle: &ResourceHandle) -> Option<&Resource> {
        self.resources.get(handle.as_str())
    }
}

impl ContentProvider for MemoryProvider {
    fn query(&self, handle: &ResourceHandle, projection: &[&str]) -> anyhow::Result<Option<Rows>> {
        let Some(r) = self.get(handle) else {
            anyhow::bail!("unknown handle {handle}");
        };
        let row = projection
            .iter()
            .map(|c| match *c {
                DISPLAY_NAME => Cell::from(r.display_name.clone()),
                SIZE => Cell::from(r.declared_size),
                _ => Cell::Null,
            })
            .collect();
        Ok(Some(Rows::new(projection.iter().copied()).with_row(row)))
    }

    fn media_type(&self, handle: &ResourceHandle) -> Option<String> {
        self.get(handle)?.mime.clone()
    }

    fn open_input(&self, handle: &ResourceHandle) -> io::Result<Box<dyn Read>> {
        match self.get(handle).and_then(|r| r.bytes.clone()) {
            Some(bytes) => Ok(Box::new(io::Cursor::new(bytes))),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no stream")),
        }
    }

    fn open_asset_descriptor(
        &self,
        handle: &ResourceHandle,
    ) -> io::Result<Option<AssetDescriptor>> {
        let Some(r) = self.get(handle).filter(|r| r.descriptor) else {
            return Ok(None);
        };
        let mut file = tempfile::tempfile()?;
        file.write_all(r.bytes.as_deref().unwrap_or_default())?;
        Ok(Some(AssetDescriptor::new(file, UNKNOWN_LENGTH)))
    }
}

impl DocumentLookup for MemoryProvider {
    fn document_name(&self, handle: &ResourceHandle) -> Option<String> {
        self.get(handle)?.document_name.clone()
    }
}
