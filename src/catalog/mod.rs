//! Schema catalog module.
//!
//! The catalog is the engine's only view of the database: table and column
//! names, types, row counts and key candidates, supplied by the metadata
//! collaborator as a read-only snapshot.
//!
//! # Example
//!
//! ```ignore
//! use querywise::catalog::{Catalog, CatalogColumn, CatalogTable, ColumnType};
//!
//! let catalog = Catalog::default().with_table(
//!     CatalogTable::new("dbo.Users")
//!         .with_column(CatalogColumn::new("id", ColumnType::Numeric))
//!         .with_primary_key("id")
//!         .with_row_count(1200),
//! );
//! ```

mod provider;
mod types;

pub use provider::{Catalog, CatalogProvider};
pub use types::{name_words, CatalogColumn, CatalogTable, ColumnType};
