use std::fmt;
use std::sync::Arc;

use crate::builtin::{Ascii, Latin1, Utf8};
use crate::driver::{language_driver_id, DEFAULT_LANGUAGE_DRIVER};
use crate::error::Result;
use crate::traits::Transcoder;

/// The codepage a table's text is stored in.
///
/// Cheap to clone; every clone shares the same transcoder.
#[derive(Clone)]
pub struct Charset {
    transcoder: Arc<dyn Transcoder>,
}

impl Charset {
    /// Wrap a host-supplied transcoder.
    pub fn new(transcoder: impl Transcoder + 'static) -> Self {
        Self {
            transcoder: Arc::new(transcoder),
        }
    }

    /// Share an existing transcoder.
    pub fn from_arc(transcoder: Arc<dyn Transcoder>) -> Self {
        Self { transcoder }
    }

    /// ISO-8859-1.
    pub fn latin1() -> Self {
        Self::new(Latin1)
    }

    /// 7-bit ASCII.
    pub fn ascii() -> Self {
        Self::new(Ascii)
    }

    /// UTF-8 passthrough.
    pub fn utf8() -> Self {
        Self::new(Utf8)
    }

    /// Codepage name reported by the transcoder.
    pub fn name(&self) -> &str {
        self.transcoder.name()
    }

    /// Language-driver byte for new table headers.
    pub fn language_driver(&self) -> u8 {
        match language_driver_id(self.name()) {
            Some(id) => id,
            None => {
                tracing::debug!(
                    charset = self.name(),
                    "no language driver for charset, using ANSI"
                );
                DEFAULT_LANGUAGE_DRIVER
            }
        }
    }

    /// Decode stored bytes into text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.transcoder.decode(bytes)
    }

    /// Encode text into stored bytes.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        self.transcoder.encode(text)
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::latin1()
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Charset")
            .field("name", &self.name())
            .finish()
    }
}
