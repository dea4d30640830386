//! In-memory mutable dBase (.dbf) table.
//!
//! A [`Table`] keeps the whole file in one byte store and computes field
//! offsets on demand, so every write lands directly in the bytes that will be
//! saved. Rows and fields are decoded lazily from that store.
//!
//! A table moves through two phases:
//! - [`Phase::SchemaDefinition`]: fresh tables only; columns may be added.
//! - [`Phase::DataEntry`]: entered on the first appended record or when a
//!   table is loaded from bytes. The schema is frozen from then on.

pub mod config;
pub mod error;
pub mod io;
pub mod table;

pub use config::{TableConfig, DEFAULT_MAX_FILE_SIZE};
pub use error::{Result, TableError};
pub use table::{Phase, Table};
