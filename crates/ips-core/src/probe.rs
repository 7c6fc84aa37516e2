//! Metadata probes.
//!
//! Each probe answers one metadata question or returns `None`. Provider
//! errors, empty result sets, missing columns and null cells all count as
//! "no answer" and never leave the probe.

use crate::handle::ResourceHandle;
use crate::mime::{self, MimeRegistry, DEFAULT_MIME};
use crate::provider::{Cell, ContentProvider, DocumentLookup, DISPLAY_NAME, SIZE};

/// Display name declared by the provider. An empty name is still an answer.
pub fn display_name_from_query(
    provider: &dyn ContentProvider,
    handle: &ResourceHandle,
) -> Option<String> {
    let rows = match provider.query(handle, &[DISPLAY_NAME]) {
        Ok(Some(rows)) => rows,
        Ok(None) => return None,
        Err(e) => {
            tracing::debug!(handle = %handle, error = %e, "display name query failed");
            return None;
        }
    };
    rows.first_cell(DISPLAY_NAME).and_then(Cell::as_string)
}

/// Name of the document behind `handle`, when the document lookup recognizes it.
pub fn name_from_document(
    documents: &dyn DocumentLookup,
    handle: &ResourceHandle,
) -> Option<String> {
    documents.document_name(handle)
}

/// Last path segment of the handle's address.
pub fn name_from_path(handle: &ResourceHandle) -> Option<String> {
    handle.last_path_segment()
}

/// Size declared by the provider. Negative values are not an answer.
pub fn size_from_query(provider: &dyn ContentProvider, handle: &ResourceHandle) -> Option<i64> {
    let rows = match provider.query(handle, &[SIZE]) {
        Ok(Some(rows)) => rows,
        Ok(None) => return None,
        Err(e) => {
            tracing::debug!(handle = %handle, error = %e, "size query failed");
            return None;
        }
    };
    rows.first_cell(SIZE)
        .and_then(Cell::as_i64)
        .filter(|n| *n >= 0)
}

/// Size from an asset descriptor: declared length when known, else `fstat` size.
/// The descriptor is dropped (closed) before returning.
pub fn size_from_descriptor(
    provider: &dyn ContentProvider,
    handle: &ResourceHandle,
) -> Option<i64> {
    let descriptor = match provider.open_asset_descriptor(handle) {
        Ok(Some(d)) => d,
        Ok(None) => return None,
        Err(e) => {
            tracing::debug!(handle = %handle, error = %e, "asset descriptor unavailable");
            return None;
        }
    };
    if descriptor.length() >= 0 {
        return Some(descriptor.length());
    }
    match descriptor.stat_size() {
        Ok(n) => i64::try_from(n).ok(),
        Err(e) => {
            tracing::debug!(handle = %handle, error = %e, "asset descriptor stat failed");
            None
        }
    }
}

/// Media type declared by the provider. Not defaulted here.
pub fn mime_from_provider(
    provider: &dyn ContentProvider,
    handle: &ResourceHandle,
) -> Option<String> {
    provider.media_type(handle)
}

/// Media type for a file name's extension; always non-empty.
pub fn mime_from_name(registry: &dyn MimeRegistry, name: &str) -> String {
    registry
        .mime_for_extension(mime::extension_of(name))
        .unwrap_or(DEFAULT_MIME)
        .to_string()
}
