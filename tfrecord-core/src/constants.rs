//! Constants and limits for the record frame format

/// Width of the little-endian `length` field
pub const LENGTH_SIZE: usize = 8;

/// Width of each little-endian masked CRC32C field
pub const CHECKSUM_SIZE: usize = 4;

/// Header size: length + masked checksum of the length
pub const HEADER_SIZE: usize = LENGTH_SIZE + CHECKSUM_SIZE;

/// Footer size: masked checksum of the payload
pub const FOOTER_SIZE: usize = CHECKSUM_SIZE;

/// Fixed per-frame overhead; a frame occupies `FRAME_OVERHEAD + length` bytes
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + FOOTER_SIZE;

/// Delta added after rotating a CRC.
///
/// Must match the value used by the TensorFlow record writers, otherwise files
/// are silently incompatible.
pub const MASK_DELTA: u32 = 0xa282_ead8;

/// Rotation applied by the mask (right by 15, left by 17)
pub const MASK_ROTATION: u32 = 15;

/// Default upper bound on a record's payload length accepted by readers.
///
/// Unbounded: any length whose checksum validates is read, limited only by
/// available memory and the stream itself.
pub const DEFAULT_MAX_RECORD_LEN: u64 = u64::MAX;
