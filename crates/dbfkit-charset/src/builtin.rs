//! Codepages that need no mapping tables.

use crate::error::{CharsetError, Result};
use crate::traits::Transcoder;

/// ISO-8859-1: every byte maps to the code point of the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latin1;

impl Transcoder for Latin1 {
    fn name(&self) -> &str {
        "iso-8859-1"
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        text.chars()
            .map(|ch| {
                u8::try_from(u32::from(ch)).map_err(|_| CharsetError::Unmappable {
                    ch,
                    charset: self.name().to_string(),
                })
            })
            .collect()
    }
}

/// 7-bit US-ASCII.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ascii;

impl Transcoder for Ascii {
    fn name(&self) -> &str {
        "ascii"
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        if let Some(&byte) = bytes.iter().find(|b| !b.is_ascii()) {
            return Err(CharsetError::InvalidByte {
                byte,
                charset: self.name().to_string(),
            });
        }
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        if let Some(ch) = text.chars().find(|ch| !ch.is_ascii()) {
            return Err(CharsetError::Unmappable {
                ch,
                charset: self.name().to_string(),
            });
        }
        Ok(text.as_bytes().to_vec())
    }
}

/// UTF-8 passthrough, for files written by modern tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8;

impl Transcoder for Utf8 {
    fn name(&self) -> &str {
        "utf-8"
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CharsetError::InvalidUtf8)
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }
}
