//! Frame encoding

use crate::checksum::masked_crc32c;
use crate::constants::FRAME_OVERHEAD;
use crate::types::RecordHeader;
use bytes::{BufMut, Bytes, BytesMut};
#[cfg(feature = "std")]
use crate::encoding::encode_checksum;
#[cfg(feature = "std")]
use crate::error::RecordError;
#[cfg(feature = "std")]
use std::io::Write;

#[cfg(feature = "logging")]
use tracing::debug;

/// Encode a record into a complete frame
///
/// The frame is laid out as:
/// 1. Length (8 bytes, little-endian)
/// 2. Masked CRC32C of the length bytes (4 bytes, little-endian)
/// 3. Payload (`length` bytes, unchanged)
/// 4. Masked CRC32C of the payload (4 bytes, little-endian)
pub fn encode_record(payload: &[u8]) -> Bytes {
    let header = RecordHeader::new(payload.len() as u64);

    let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + payload.len());
    buf.put_u64_le(header.length);
    buf.put_u32_le(header.length_checksum);
    buf.put_slice(payload);
    buf.put_u32_le(masked_crc32c(payload));

    buf.freeze()
}

/// Append one record to `writer`
///
/// Writes the four frame fields in order. If the writer fails part-way the
/// bytes already written stay in place; readers report the partial frame as
/// [`RecordError::TruncatedRecord`].
#[cfg(feature = "std")]
pub fn write_record<W: Write>(writer: &mut W, payload: &[u8]) -> Result<(), RecordError> {
    let header = RecordHeader::new(payload.len() as u64);

    writer.write_all(&header.encode())?;
    writer.write_all(payload)?;
    writer.write_all(&encode_checksum(masked_crc32c(payload)))?;

    #[cfg(feature = "logging")]
    debug!("Wrote record ({} payload bytes)", payload.len());

    Ok(())
}

/// Sequential record writer over any [`Write`]
///
/// Owns its sink for the lifetime of the writer; there is one writer per
/// stream.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    inner: W,
    records_written: u64,
    bytes_written: u64,
}

#[cfg(feature = "std")]
impl<W: Write> RecordWriter<W> {
    /// Create a writer appending to `inner` at its current position
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
            bytes_written: 0,
        }
    }

    /// Append one record
    pub fn write_record(&mut self, payload: &[u8]) -> Result<(), RecordError> {
        write_record(&mut self.inner, payload)?;

        self.records_written += 1;
        self.bytes_written += (FRAME_OVERHEAD + payload.len()) as u64;
        Ok(())
    }

    /// Serialize `value` and append it as one record
    pub fn write<T: crate::types::RecordSerializable>(
        &mut self,
        value: &T,
    ) -> Result<(), RecordError> {
        let payload = value.to_payload()?;
        self.write_record(&payload)
    }

    /// Flush the underlying sink
    pub fn flush(&mut self) -> Result<(), RecordError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Number of records successfully written
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Number of frame bytes successfully written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Borrow the underlying sink
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the underlying sink without flushing
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty_record() {
        let encoded = encode_record(b"");

        assert_eq!(encoded.len(), FRAME_OVERHEAD);
        assert_eq!(&encoded[0..8], &[0u8; 8]);
        assert_eq!(&encoded[8..12], &0x0798_0329u32.to_le_bytes());
        // masked CRC of empty input is the mask delta itself
        assert_eq!(&encoded[12..16], &0xa282_ead8u32.to_le_bytes());
    }

    #[test]
    fn test_encode_layout() {
        let payload = b"Ala ma kota";
        let encoded = encode_record(payload);

        assert_eq!(encoded.len(), FRAME_OVERHEAD + payload.len());
        assert_eq!(&encoded[0..8], &11u64.to_le_bytes());
        assert_eq!(&encoded[12..23], payload);
        assert_eq!(&encoded[23..27], &masked_crc32c(payload).to_le_bytes());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_write_record_matches_encode() {
        let mut out = Vec::new();
        write_record(&mut out, b"Ala ma kota").unwrap();

        assert_eq!(out, encode_record(b"Ala ma kota").to_vec());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_writer_counters() {
        let mut writer = RecordWriter::new(Vec::new());
        writer.write_record(b"one").unwrap();
        writer.write_record(b"").unwrap();
        writer.write(&String::from("three")).unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.records_written(), 3);
        assert_eq!(writer.bytes_written(), 16 * 3 + 3 + 5);
        assert_eq!(writer.get_ref().len() as u64, writer.bytes_written());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_write_failure_propagates() {
        struct Failing;

        impl Write for Failing {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("sink closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = RecordWriter::new(Failing);
        assert!(matches!(
            writer.write_record(b"payload"),
            Err(RecordError::Io(_))
        ));
        assert_eq!(writer.records_written(), 0);
    }
}
