use dbfkit_charset::Charset;

/// Default upper bound for tables read from a stream: 256 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 256 * 1024 * 1024;

/// Configuration for opening or creating a table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Codepage of names and text values. Default: Latin-1.
    pub charset: Charset,
    /// Largest table [`Table::read_from`](crate::Table::read_from) will
    /// buffer. Default: 256 MiB.
    pub max_file_size: usize,
}

impl TableConfig {
    /// Default configuration with an explicit charset.
    pub fn with_charset(charset: Charset) -> Self {
        Self {
            charset,
            ..Self::default()
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            charset: Charset::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}
