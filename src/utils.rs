//! Word and BCD conversion helpers.
//!
//! These are the pure numeric transformations the frame encoder is built on.
//! They never fail: values that do not fit are truncated to the low bits the
//! same way the wire format would truncate them. Range checks belong to the
//! encoder's validation policy, not to these helpers.
//!
//! # Example
//!
//! ```
//! use fins_frame::utils::{to_word, to_bcd_word, from_word, format_hex_bytes};
//!
//! assert_eq!(to_word(0x1234), [0x12, 0x34]);
//! assert_eq!(from_word([0x12, 0x34]), 0x1234);
//! assert_eq!(to_bcd_word(1234), [0x12, 0x34]);
//! assert_eq!(format_hex_bytes(&[0x46, 0x49]), "46 49 (length: 2)");
//! ```

use std::fmt::Write as _;

use crate::error::{FinsError, Result};

/// Largest value that packs into one BCD word.
pub const BCD_WORD_MAX: u32 = 9999;

/// Splits a value into a big-endian word `[high, low]`.
///
/// Only the low 16 bits are kept.
///
/// # Example
///
/// ```
/// use fins_frame::utils::to_word;
///
/// assert_eq!(to_word(100), [0x00, 0x64]);
/// assert_eq!(to_word(0x1_ABCD), [0xAB, 0xCD]);
/// ```
#[inline]
pub fn to_word(value: u32) -> [u8; 2] {
    [((value >> 8) & 0xFF) as u8, (value & 0xFF) as u8]
}

/// Splits every value into a word, preserving order.
///
/// The output is twice as long as the input.
pub fn to_words(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|&value| to_word(value)).collect()
}

/// Joins a big-endian word `[high, low]` back into a 16-bit value.
#[inline]
pub fn from_word(word: [u8; 2]) -> u16 {
    u16::from_be_bytes(word)
}

/// Returns whether `value` packs into a single BCD word.
#[inline]
pub fn is_bcd_encodable(value: u32) -> bool {
    value <= BCD_WORD_MAX
}

/// Packs a decimal value into a BCD word.
///
/// The first byte holds the thousands and hundreds, the second the tens and
/// ones. Values above [`BCD_WORD_MAX`] go through the same arithmetic and each
/// packed byte is truncated to 8 bits; the result is not valid BCD.
///
/// # Example
///
/// ```
/// use fins_frame::utils::to_bcd_word;
///
/// assert_eq!(to_bcd_word(0), [0x00, 0x00]);
/// assert_eq!(to_bcd_word(42), [0x00, 0x42]);
/// assert_eq!(to_bcd_word(9999), [0x99, 0x99]);
/// ```
pub fn to_bcd_word(value: u32) -> [u8; 2] {
    let upper = value / 100;
    let lower = value % 100;
    [pack_bcd_byte(upper), pack_bcd_byte(lower)]
}

#[inline]
fn pack_bcd_byte(two_digits: u32) -> u8 {
    (16 * (two_digits / 10) + two_digits % 10) as u8
}

/// Packs every value into a BCD word, preserving order.
pub fn to_bcd_words(values: &[u32]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|&value| to_bcd_word(value))
        .collect()
}

/// Unpacks a BCD word back into its decimal value.
///
/// # Errors
///
/// Returns `FinsError::InvalidParameter` if any nibble is above 9.
///
/// # Example
///
/// ```
/// use fins_frame::utils::from_bcd_word;
///
/// assert_eq!(from_bcd_word([0x12, 0x34]).unwrap(), 1234);
/// assert!(from_bcd_word([0x1A, 0x00]).is_err());
/// ```
pub fn from_bcd_word(word: [u8; 2]) -> Result<u16> {
    let mut value: u16 = 0;
    for byte in word {
        for nibble in [byte >> 4, byte & 0x0F] {
            if nibble > 9 {
                return Err(FinsError::invalid_parameter(
                    "word",
                    format!("nibble 0x{:X} is not a decimal digit", nibble),
                ));
            }
            value = value * 10 + u16::from(nibble);
        }
    }
    Ok(value)
}

/// Formats bytes as lowercase hex pairs followed by the byte count.
///
/// # Example
///
/// ```
/// use fins_frame::utils::format_hex_bytes;
///
/// assert_eq!(format_hex_bytes(&[0x00, 0xAB]), "00 ab (length: 2)");
/// assert_eq!(format_hex_bytes(&[]), "(length: 0)");
/// ```
pub fn format_hex_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3 + 16);
    for byte in bytes {
        // Writing to a String cannot fail.
        let _ = write!(out, "{:02x} ", byte);
    }
    let _ = write!(out, "(length: {})", bytes.len());
    out
}
