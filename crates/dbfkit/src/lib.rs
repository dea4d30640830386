//! Read, create and edit dBase (.dbf) tables.
//!
//! dbfkit handles the dBase III/IV/V family of table files: a 32-byte
//! header, an array of column descriptors and fixed-width records, with all
//! text in a caller-chosen codepage.
//!
//! # Crate Structure
//!
//! - [`charset`]: Codepage transcoding and language-driver ids
//! - [`codec`]: Header, descriptor, field and record codecs
//! - [`table`]: In-memory mutable table (behind `table` feature, on by default)
//!
//! # Example
//!
//! ```
//! use dbfkit::charset::Charset;
//! use dbfkit::table::Table;
//!
//! let mut table = Table::new(Charset::latin1());
//! table.add_text_column("NAME", 20)?;
//! table.add_number_column("AGE", 3, 0)?;
//!
//! let row = table.append_row()?;
//! table.set_field_by_name(row, "NAME", "Vera")?;
//! table.set_value_by_name(row, "AGE", 31)?;
//!
//! let bytes = table.to_bytes();
//! let loaded = Table::from_bytes(&bytes, Charset::latin1())?;
//! assert_eq!(loaded.int64_value_by_name(0, "age")?, 31);
//! # Ok::<(), dbfkit::table::TableError>(())
//! ```

/// Re-export charset types.
pub mod charset {
    pub use dbfkit_charset::*;
}

/// Re-export codec types.
pub mod codec {
    pub use dbfkit_codec::*;
}

/// Re-export table types (requires `table` feature).
#[cfg(feature = "table")]
pub mod table {
    pub use dbfkit_table::*;
}
