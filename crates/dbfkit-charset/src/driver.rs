//! dBase language-driver identifiers.
//!
//! Byte 29 of a table header tags the codepage the text was written in.
//! Readers mostly ignore it, but new tables should carry a sensible value.

/// Language driver written when the codepage has no known identifier (ANSI).
pub const DEFAULT_LANGUAGE_DRIVER: u8 = 0x57;

/// Codepage number to language-driver byte.
const LANGUAGE_DRIVERS: &[(u16, u8)] = &[
    (437, 0x01),
    (850, 0x02),
    (1252, 0x03),
    (10000, 0x04),
    (852, 0x64),
    (866, 0x65),
    (865, 0x66),
    (861, 0x67),
    (895, 0x68),
    (620, 0x69),
    (737, 0x6A),
    (857, 0x6B),
    (863, 0x6C),
    (936, 0x7A),
    (949, 0x79),
    (950, 0x78),
    (932, 0x7B),
    (874, 0x7C),
    (1255, 0x7D),
    (1256, 0x7E),
    (1250, 0xC8),
    (1251, 0xC9),
    (1254, 0xCA),
    (1253, 0xCB),
    (1257, 0xCC),
];

/// Look up the language-driver byte for a codepage name.
///
/// Accepts bare numbers and the usual prefixes, case-insensitively:
/// `"850"`, `"cp850"`, `"IBM850"`, `"windows-1252"`.
pub fn language_driver_id(name: &str) -> Option<u8> {
    let lowered = name.trim().to_ascii_lowercase();
    let digits = ["windows-", "windows", "ibm", "cp", "dos-", "x-mac-"]
        .iter()
        .find_map(|prefix| lowered.strip_prefix(prefix))
        .unwrap_or(lowered.as_str());

    let codepage: u16 = digits.parse().ok()?;
    LANGUAGE_DRIVERS
        .iter()
        .find(|(cp, _)| *cp == codepage)
        .map(|(_, id)| *id)
}
