//! Core types for record frames

use crate::constants::{DEFAULT_MAX_RECORD_LEN, HEADER_SIZE, LENGTH_SIZE};
use crate::encoding::{decode_checksum, decode_length, encode_checksum, encode_length, length_checksum};
use crate::error::RecordError;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use bytes::Bytes;

/// Frame header: the payload length and the masked checksum protecting it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordHeader {
    /// Length of the payload in bytes
    pub length: u64,

    /// Masked CRC32C of the little-endian `length`
    pub length_checksum: u32,
}

impl RecordHeader {
    /// Create the header for a payload of `length` bytes
    pub fn new(length: u64) -> Self {
        Self {
            length,
            length_checksum: length_checksum(length),
        }
    }

    /// Encode into the 12-byte on-stream representation
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..LENGTH_SIZE].copy_from_slice(&encode_length(self.length));
        buf[LENGTH_SIZE..].copy_from_slice(&encode_checksum(self.length_checksum));
        buf
    }

    /// Decode from the 12-byte on-stream representation without validating
    pub fn decode(buf: &[u8; HEADER_SIZE]) -> Self {
        let mut length = [0u8; LENGTH_SIZE];
        length.copy_from_slice(&buf[..LENGTH_SIZE]);
        let mut checksum = [0u8; HEADER_SIZE - LENGTH_SIZE];
        checksum.copy_from_slice(&buf[LENGTH_SIZE..]);

        Self {
            length: decode_length(length),
            length_checksum: decode_checksum(checksum),
        }
    }

    /// Check the stored checksum against the length
    pub fn verify(&self) -> Result<(), RecordError> {
        let actual = length_checksum(self.length);
        if actual != self.length_checksum {
            return Err(RecordError::LengthChecksumMismatch {
                expected: self.length_checksum,
                actual,
            });
        }
        Ok(())
    }

    /// Total bytes the frame described by this header occupies
    ///
    /// Saturates for lengths within 16 bytes of `u64::MAX`.
    pub fn frame_len(&self) -> u64 {
        self.length
            .saturating_add(crate::constants::FRAME_OVERHEAD as u64)
    }
}

/// Options controlling how records are read back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Largest payload length accepted after the length checksum validates
    pub max_record_len: u64,
}

impl ReaderOptions {
    /// Default options: no length bound beyond memory
    pub const fn new() -> Self {
        Self {
            max_record_len: DEFAULT_MAX_RECORD_LEN,
        }
    }

    /// Reject records longer than `max` bytes
    pub const fn max_record_len(mut self, max: u64) -> Self {
        self.max_record_len = max;
        self
    }

    /// Apply the length bound, including the platform's addressable size
    pub(crate) fn check_length(&self, length: u64) -> Result<usize, RecordError> {
        if length > self.max_record_len {
            return Err(RecordError::RecordTooLarge {
                length,
                max: self.max_record_len,
            });
        }
        usize::try_from(length).map_err(|_| RecordError::RecordTooLarge {
            length,
            max: usize::MAX as u64,
        })
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for types that can be stored as record payloads
pub trait RecordSerializable {
    /// Serialize this value into payload bytes
    fn to_payload(&self) -> Result<Bytes, RecordError>;

    /// Deserialize from payload bytes
    fn from_payload(bytes: &[u8]) -> Result<Self, RecordError>
    where
        Self: Sized;
}

impl RecordSerializable for Vec<u8> {
    fn to_payload(&self) -> Result<Bytes, RecordError> {
        Ok(Bytes::copy_from_slice(self))
    }

    fn from_payload(bytes: &[u8]) -> Result<Self, RecordError> {
        Ok(bytes.to_vec())
    }
}

impl RecordSerializable for Bytes {
    fn to_payload(&self) -> Result<Bytes, RecordError> {
        Ok(self.clone())
    }

    fn from_payload(bytes: &[u8]) -> Result<Self, RecordError> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}

impl RecordSerializable for String {
    fn to_payload(&self) -> Result<Bytes, RecordError> {
        Ok(Bytes::copy_from_slice(self.as_bytes()))
    }

    fn from_payload(bytes: &[u8]) -> Result<Self, RecordError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| RecordError::Serialization(e.to_string()))
    }
}
