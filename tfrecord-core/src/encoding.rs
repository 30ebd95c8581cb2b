//! Little-endian field encodings
//!
//! Both integer widths and byte order are fixed by the wire format: the
//! length is always 8 bytes and every checksum is 4 bytes, little-endian.

use crate::checksum::masked_crc32c;
use crate::constants::{CHECKSUM_SIZE, LENGTH_SIZE};

/// Encode a record length as 8 little-endian bytes
#[inline]
pub const fn encode_length(length: u64) -> [u8; LENGTH_SIZE] {
    length.to_le_bytes()
}

/// Decode a record length from 8 little-endian bytes
#[inline]
pub const fn decode_length(bytes: [u8; LENGTH_SIZE]) -> u64 {
    u64::from_le_bytes(bytes)
}

/// Encode a (masked) checksum as 4 little-endian bytes
#[inline]
pub const fn encode_checksum(checksum: u32) -> [u8; CHECKSUM_SIZE] {
    checksum.to_le_bytes()
}

/// Decode a (masked) checksum from 4 little-endian bytes
#[inline]
pub const fn decode_checksum(bytes: [u8; CHECKSUM_SIZE]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// Masked CRC32C of the little-endian encoding of `length`
#[inline]
pub fn length_checksum(length: u64) -> u32 {
    masked_crc32c(&encode_length(length))
}
