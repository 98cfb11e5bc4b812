//! CatalogProvider trait definition.
//!
//! The engine reads schema metadata through this trait only. Whoever owns the
//! metadata (a discovery job, a JSON snapshot, a test fixture) implements it
//! and replaces the snapshot wholesale when it changes; the engine never
//! mutates it.

use super::types::CatalogTable;

/// Read-only access to a catalog snapshot.
///
/// Implementations must be `Sync` so that concurrent parses can share one
/// snapshot without locking.
pub trait CatalogProvider: Send + Sync {
    /// All tables of the snapshot, in a stable order.
    fn get_tables(&self) -> &[CatalogTable];

    /// Find a table by its stored name (case-insensitive).
    fn find_table(&self, name: &str) -> Option<&CatalogTable> {
        self.get_tables()
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    fn is_empty(&self) -> bool {
        self.get_tables().is_empty()
    }
}

impl CatalogProvider for [CatalogTable] {
    fn get_tables(&self) -> &[CatalogTable] {
        self
    }
}

impl CatalogProvider for Vec<CatalogTable> {
    fn get_tables(&self) -> &[CatalogTable] {
        self.as_slice()
    }
}

/// An owned catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    pub tables: Vec<CatalogTable>,
}

impl Catalog {
    pub fn new(tables: Vec<CatalogTable>) -> Self {
        Self { tables }
    }

    pub fn with_table(mut self, table: CatalogTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Keep only tables with at least `min_rows` rows.
    ///
    /// Empty tables make poor targets for a natural-language request, so
    /// callers usually filter them before handing the snapshot over.
    pub fn with_min_rows(mut self, min_rows: u64) -> Self {
        self.tables.retain(|t| t.row_count >= min_rows);
        self
    }
}

impl CatalogProvider for Catalog {
    fn get_tables(&self) -> &[CatalogTable] {
        &self.tables
    }
}
