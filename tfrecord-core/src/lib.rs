//! # TFRecord Core
//!
//! A length-prefixed binary record framing format with per-field CRC32C checksums.
//!
//! Every record is stored as a frame:
//!
//! ```text
//! uint64 length                       (little-endian)
//! uint32 masked_crc32c(length bytes)  (little-endian)
//! byte   payload[length]
//! uint32 masked_crc32c(payload)       (little-endian)
//! ```
//!
//! Frames are concatenated with no padding or separator.
//!
//! ## Modules
//!
//! - `constants`: Frame format constants and limits
//! - `checksum`: CRC32C binding and the checksum masking transform
//! - `encoding`: Little-endian length/checksum field encodings
//! - `types`: Core types (RecordHeader, ReaderOptions, RecordSerializable)
//! - `encoder`: Frame encoding and the stream writer
//! - `decoder`: Strict frame decoding and the stream reader
//! - `verify`: Whole-stream verification report
//! - `example`: Typed feature records used as payloads

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod checksum;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod encoding;
pub mod error;
#[cfg(feature = "example")]
pub mod example;
pub mod types;
pub mod verify;

// Re-export commonly used types
pub use error::RecordError;
pub use types::{ReaderOptions, RecordHeader, RecordSerializable};

#[cfg(feature = "std")]
pub use decoder::{read_record, RecordReader};
#[cfg(feature = "std")]
pub use encoder::{write_record, RecordWriter};
#[cfg(feature = "example")]
pub use example::{Example, Feature};

/// Result type alias for record framing operations
pub type Result<T> = core::result::Result<T, RecordError>;
