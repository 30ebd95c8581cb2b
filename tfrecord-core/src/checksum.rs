//! CRC32C checksums and the masking transform
//!
//! Records store masked checksums. Computing the CRC of data that itself
//! embeds CRCs is problematic, and an all-zero CRC is easy to confuse with
//! "no checksum"; the mask rotates the CRC and adds a constant to avoid both.

use crate::constants::{MASK_DELTA, MASK_ROTATION};

/// Compute the CRC-32C (Castagnoli) checksum of `data`
#[inline]
pub fn crc32c(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}

/// Mask a CRC for storage: rotate right by 15 bits, then add [`MASK_DELTA`]
#[inline]
pub const fn mask(crc: u32) -> u32 {
    crc.rotate_right(MASK_ROTATION).wrapping_add(MASK_DELTA)
}

/// Inverse of [`mask`]
#[inline]
pub const fn unmask(masked: u32) -> u32 {
    masked.wrapping_sub(MASK_DELTA).rotate_left(MASK_ROTATION)
}

/// Masked CRC32C of `data`, the value stored in a frame
#[inline]
pub fn masked_crc32c(data: &[u8]) -> u32 {
    mask(crc32c(data))
}
