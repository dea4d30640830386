//! Pluggable codepage transcoding for dBase table text.
//!
//! dBase files store names and field values in a legacy 8-bit codepage. The
//! codec layers never interpret those bytes themselves: they hand them to a
//! [`Transcoder`] carried by a [`Charset`] value and work with Rust strings
//! from then on.
//!
//! Only table-free codepages ship here (Latin-1, ASCII, UTF-8 passthrough).
//! Hosts that need cp850, cp1251 and friends implement [`Transcoder`] over
//! whatever mapping tables they already use.

pub mod builtin;
pub mod charset;
pub mod driver;
pub mod error;
pub mod traits;

pub use builtin::{Ascii, Latin1, Utf8};
pub use charset::Charset;
pub use driver::{language_driver_id, DEFAULT_LANGUAGE_DRIVER};
pub use error::{CharsetError, Result};
pub use traits::Transcoder;
