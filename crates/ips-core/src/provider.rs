//! Inbound capability boundary.
//!
//! The host environment supplies implementations of these traits; the core
//! only ever reaches resource bytes and metadata through them.

use std::fs::File;
use std::io::{self, Read};

use crate::handle::ResourceHandle;

/// Column carrying a resource's display name.
pub const DISPLAY_NAME: &str = "_display_name";
/// Column carrying a resource's size in bytes.
pub const SIZE: &str = "_size";

/// Sentinel for an asset descriptor whose length the provider does not know.
pub const UNKNOWN_LENGTH: i64 = -1;

/// One cell of a query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Null,
    Integer(i64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// String value of a non-null cell.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Integer(n) => Some(n.to_string()),
            Cell::Text(s) => Some(s.clone()),
        }
    }

    /// Integer value of a non-null cell; text cells are parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Null => None,
            Cell::Integer(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Integer(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// Tabular query result with named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rows {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Rows {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with nulls, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.push_row(row);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of `column` in the first row, if both exist.
    pub fn first_cell(&self, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.first()?.get(idx)
    }
}

/// Byte-range descriptor for a resource.
///
/// Owns the underlying file; dropping the descriptor closes it.
#[derive(Debug)]
pub struct AssetDescriptor {
    length: i64,
    file: File,
}

impl AssetDescriptor {
    /// `length` may be [`UNKNOWN_LENGTH`] when the provider can't tell.
    pub fn new(file: File, length: i64) -> Self {
        Self { length, file }
    }

    /// Declared length; negative when unknown.
    pub fn length(&self) -> i64 {
        self.length
    }

    /// Size reported by `fstat` on the underlying file.
    pub fn stat_size(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

/// Provider-style access to a resource: tabular metadata, declared type, bytes.
pub trait ContentProvider {
    /// Query `projection` columns for `handle`. `Ok(None)` means the provider
    /// returned no result set at all.
    fn query(&self, handle: &ResourceHandle, projection: &[&str]) -> anyhow::Result<Option<Rows>>;

    /// Media type the provider declares for `handle`.
    fn media_type(&self, handle: &ResourceHandle) -> Option<String>;

    /// Open the resource's byte stream for reading.
    fn open_input(&self, handle: &ResourceHandle) -> io::Result<Box<dyn Read>>;

    /// Open a read-only asset descriptor. `Ok(None)` when the provider has none.
    fn open_asset_descriptor(&self, handle: &ResourceHandle)
        -> io::Result<Option<AssetDescriptor>>;
}

/// Document-abstraction lookup keyed by handle.
pub trait DocumentLookup {
    /// Name of the document behind `handle`, or `None` when the handle is not
    /// a recognized document or has no name.
    fn document_name(&self, handle: &ResourceHandle) -> Option<String>;
}

/// Lookup that recognizes no documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocuments;

impl DocumentLookup for NoDocuments {
    fn document_name(&self, _handle: &ResourceHandle) -> Option<String> {
        None
    }
}
