//! Error types for record framing operations

use alloc::string::String;

/// Errors that can occur while writing or reading records
///
/// [`RecordError::EndOfStream`] is the clean end of a record sequence and must
/// be told apart from every other variant, which all signal a damaged or
/// unreadable stream.
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug)]
pub enum RecordError {
    /// No bytes were available where a new frame would start
    #[cfg_attr(feature = "std", error("End of stream"))]
    EndOfStream,

    /// The stream ended part-way through a frame
    #[cfg_attr(
        feature = "std",
        error("Truncated record: expected {expected} bytes, got {actual}")
    )]
    TruncatedRecord {
        /// Bytes needed from the start of the frame to complete it
        /// (the header alone while the length is still unverified).
        expected: u64,
        /// Bytes actually available from the start of the frame.
        actual: u64,
    },

    /// The length field does not match its checksum
    #[cfg_attr(
        feature = "std",
        error("Length checksum mismatch: expected {expected:#010x}, got {actual:#010x}")
    )]
    LengthChecksumMismatch {
        /// The masked checksum stored in the frame.
        expected: u32,
        /// The masked checksum computed over the length field.
        actual: u32,
    },

    /// The payload does not match its checksum
    #[cfg_attr(
        feature = "std",
        error("Payload checksum mismatch: expected {expected:#010x}, got {actual:#010x}")
    )]
    PayloadChecksumMismatch {
        /// The masked checksum stored in the frame.
        expected: u32,
        /// The masked checksum computed over the payload.
        actual: u32,
    },

    /// Verified record length exceeds the reader's configured bound
    #[cfg_attr(feature = "std", error("Record length {length} exceeds maximum {max}"))]
    RecordTooLarge {
        /// Declared payload length.
        length: u64,
        /// Configured maximum.
        max: u64,
    },

    /// Underlying transport failure
    #[cfg(feature = "std")]
    #[cfg_attr(feature = "std", error("IO error: {0}"))]
    Io(#[source] std::io::Error),

    /// Payload (de)serialization error
    #[cfg_attr(feature = "std", error("Serialization error: {0}"))]
    Serialization(String),

    /// A loosely typed value could not be mapped to a feature
    #[cfg_attr(feature = "std", error("Unsupported feature {key:?}: {reason}"))]
    UnsupportedFeature {
        /// Feature key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl RecordError {
    /// Whether this is the clean end of a record sequence
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, RecordError::EndOfStream)
    }

    /// Whether this error indicates corrupted or incomplete frame data
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            RecordError::TruncatedRecord { .. }
                | RecordError::LengthChecksumMismatch { .. }
                | RecordError::PayloadChecksumMismatch { .. }
        )
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for RecordError {
    fn from(err: std::io::Error) -> Self {
        RecordError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_stream_is_distinct() {
        assert!(RecordError::EndOfStream.is_end_of_stream());
        assert!(!RecordError::EndOfStream.is_corruption());

        let truncated = RecordError::TruncatedRecord {
            expected: 16,
            actual: 10,
        };
        assert!(!truncated.is_end_of_stream());
        assert!(truncated.is_corruption());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_display_messages() {
        let err = RecordError::LengthChecksumMismatch {
            expected: 0x0798_0329,
            actual: 0x37d5_6973,
        };
        assert_eq!(
            err.to_string(),
            "Length checksum mismatch: expected 0x07980329, got 0x37d56973"
        );

        let io: RecordError = std::io::Error::other("disk gone").into();
        assert!(matches!(io, RecordError::Io(_)));
        assert!(io.to_string().contains("disk gone"));
    }
}
