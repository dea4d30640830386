use std::fmt::Debug;

use crate::error::Result;

/// Converts between raw codepage bytes and text.
///
/// This is the only place text encoding is decided. Implementations must be
/// stateless from the caller's point of view: the same input always yields the
/// same output, and a table may call them from any thread.
pub trait Transcoder: Debug + Send + Sync {
    /// Canonical codepage name, e.g. `"cp850"`.
    ///
    /// Used to pick the language-driver byte written into new tables.
    fn name(&self) -> &str;

    /// Decode stored bytes into text.
    fn decode(&self, bytes: &[u8]) -> Result<String>;

    /// Encode text into stored bytes.
    fn encode(&self, text: &str) -> Result<Vec<u8>>;
}
