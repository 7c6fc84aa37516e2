//! Metadata resolution over ordered probe chains.
//!
//! Each question (name, size, media type) runs its probes in reliability
//! order: provider-declared metadata, then structural inference, then a
//! synthesized default. The first probe that answers wins.

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::handle::ResourceHandle;
use crate::mime::{BuiltinMimeRegistry, MimeRegistry};
use crate::probe;
use crate::provider::{ContentProvider, DocumentLookup, NoDocuments};

/// Size reported when no probe could determine it.
pub const UNKNOWN_SIZE: i64 = -1;

/// Prefix of synthesized names.
pub const SYNTHESIZED_PREFIX: &str = "share_";

/// Metadata for one handle, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    pub name: String,
    /// Bytes, or [`UNKNOWN_SIZE`].
    pub size: i64,
    pub mime_type: String,
}

impl ResolvedMetadata {
    pub fn size_known(&self) -> bool {
        self.size >= 0
    }
}

type Probe<'p, T> = (&'static str, &'p dyn Fn() -> Option<T>);

/// Run probes in order and return the first answer.
fn first_answer<T>(question: &str, probes: &[Probe<'_, T>]) -> Option<T> {
    for (tier, run) in probes {
        if let Some(answer) = run() {
            tracing::trace!(question, tier, "probe answered");
            return Some(answer);
        }
        tracing::trace!(question, tier, "probe had no answer");
    }
    None
}

/// Resolves name, size and media type for provider handles.
pub struct MetadataResolver<'a> {
    provider: &'a dyn ContentProvider,
    documents: &'a dyn DocumentLookup,
    registry: &'a dyn MimeRegistry,
    clock: &'a dyn Clock,
}

impl<'a> MetadataResolver<'a> {
    /// Resolver with no document lookup, the built-in registry and the system clock.
    pub fn new(provider: &'a dyn ContentProvider) -> Self {
        Self {
            provider,
            documents: &NoDocuments,
            registry: &BuiltinMimeRegistry,
            clock: &SystemClock,
        }
    }

    pub fn with_documents(mut self, documents: &'a dyn DocumentLookup) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_registry(mut self, registry: &'a dyn MimeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn provider(&self) -> &'a dyn ContentProvider {
        self.provider
    }

    /// Display name for `handle`. Never fails; the last resort is
    /// `share_<epochMillis><.ext>` with the extension of the declared media type.
    pub fn file_name(&self, handle: &ResourceHandle) -> String {
        let from_query = || probe::display_name_from_query(self.provider, handle);
        let from_document = || probe::name_from_document(self.documents, handle);
        let from_path = || probe::name_from_path(handle);

        let probes: [Probe<'_, String>; 3] = [
            ("query", &from_query),
            ("document", &from_document),
            ("path", &from_path),
        ];
        first_answer("name", &probes).unwrap_or_else(|| self.synthesized_name(handle))
    }

    fn synthesized_name(&self, handle: &ResourceHandle) -> String {
        let extension = self
            .mime_type(handle)
            .and_then(|mime| self.registry.extension_for_mime(&mime).map(|e| format!(".{e}")))
            .unwrap_or_default();
        let name = format!("{SYNTHESIZED_PREFIX}{}{extension}", self.clock.now_millis());
        tracing::debug!(handle = %handle, name = %name, "no name available, synthesized one");
        name
    }

    /// Size in bytes, or [`UNKNOWN_SIZE`]. Never fails.
    pub fn file_size(&self, handle: &ResourceHandle) -> i64 {
        let from_query = || probe::size_from_query(self.provider, handle);
        let from_descriptor = || probe::size_from_descriptor(self.provider, handle);

        let probes: [Probe<'_, i64>; 2] = [("query", &from_query), ("descriptor", &from_descriptor)];
        first_answer("size", &probes).unwrap_or(UNKNOWN_SIZE)
    }

    /// Media type declared by the provider, if any.
    pub fn mime_type(&self, handle: &ResourceHandle) -> Option<String> {
        probe::mime_from_provider(self.provider, handle)
    }

    /// Media type for a file name; `application/octet-stream` when unmapped.
    pub fn mime_type_for_name(&self, name: &str) -> String {
        probe::mime_from_name(self.registry, name)
    }

    /// Resolve all three fields. The media type falls back to the one implied by
    /// the resolved name when the provider declares none.
    pub fn resolve(&self, handle: &ResourceHandle) -> ResolvedMetadata {
        let name = self.file_name(handle);
        let size = self.file_size(handle);
        let mime_type = self
            .mime_type(handle)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.mime_type_for_name(&name));
        ResolvedMetadata {
            name,
            size,
            mime_type,
        }
    }
}
