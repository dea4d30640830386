/// Errors that can occur while transcoding between a codepage and text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharsetError {
    /// A character has no representation in the target codepage.
    #[error("character {ch:?} cannot be encoded as {charset}")]
    Unmappable { ch: char, charset: String },

    /// A stored byte is not valid in the source codepage.
    #[error("byte 0x{byte:02X} is not valid {charset}")]
    InvalidByte { byte: u8, charset: String },

    /// Stored bytes are not valid UTF-8.
    #[error("stored text is not valid UTF-8")]
    InvalidUtf8,
}

pub type Result<T> = std::result::Result<T, CharsetError>;
