//! Whole-buffer adapters between tables and `std::io` streams.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::table::Table;

impl Table {
    /// Read a complete table from a stream.
    ///
    /// The stream is buffered in full; more than `config.max_file_size`
    /// bytes is an `InvalidData` I/O error.
    pub fn read_from<R: Read>(reader: R, config: TableConfig) -> Result<Self> {
        let max = config.max_file_size;
        let limit = u64::try_from(max.saturating_add(1)).unwrap_or(u64::MAX);

        let mut data = Vec::new();
        reader.take(limit).read_to_end(&mut data)?;
        if data.len() > max {
            return Err(TableError::Io(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("table exceeds configured max ({max} bytes)"),
            )));
        }

        Self::from_bytes_with_config(&data, config)
    }

    /// Write the serialized table, including the end-of-file marker.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Open a table file.
    pub fn open(path: impl AsRef<Path>, config: TableConfig) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening table");
        Self::read_from(BufReader::new(File::open(path)?), config)
    }

    /// Write the table to a file, replacing any existing content.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "saving table");
        self.write_to(BufWriter::new(File::create(path)?))
    }
}
