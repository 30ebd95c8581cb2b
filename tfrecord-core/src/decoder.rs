//! Frame decoding (strict mode)
//!
//! Reading is strictly sequential: each call consumes exactly one frame,
//! validates the length checksum before trusting the length, then validates
//! the payload checksum. There is no resynchronization; the first damaged
//! frame ends the read.

use crate::checksum::masked_crc32c;
use crate::constants::{CHECKSUM_SIZE, FRAME_OVERHEAD, HEADER_SIZE};
use crate::encoding::decode_checksum;
use crate::error::RecordError;
use crate::types::{ReaderOptions, RecordHeader};
use bytes::Bytes;
use core::ops::Range;
#[cfg(feature = "std")]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::io::{ErrorKind, Read};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Initial payload buffer reservation; larger payloads grow as bytes arrive
#[cfg(feature = "std")]
const INITIAL_PAYLOAD_CAPACITY: usize = 64 * 1024;

/// Read one record from `reader`
///
/// Returns [`RecordError::EndOfStream`] when the reader is exhausted exactly
/// at a frame boundary. Any other short read is a
/// [`RecordError::TruncatedRecord`].
#[cfg(feature = "std")]
pub fn read_record<R: Read>(reader: &mut R) -> Result<Bytes, RecordError> {
    read_record_with_options(reader, &ReaderOptions::default())
}

/// Read one record from `reader`, applying `options`
#[cfg(feature = "std")]
pub fn read_record_with_options<R: Read>(
    reader: &mut R,
    options: &ReaderOptions,
) -> Result<Bytes, RecordError> {
    // Length and its checksum
    let mut header_buf = [0u8; HEADER_SIZE];
    let got = read_full(reader, &mut header_buf)?;
    if got == 0 {
        return Err(RecordError::EndOfStream);
    }
    if got < HEADER_SIZE {
        return Err(truncated(HEADER_SIZE as u64, got as u64));
    }

    let header = RecordHeader::decode(&header_buf);
    if let Err(e) = header.verify() {
        #[cfg(feature = "logging")]
        warn!("Rejecting record: {}", e);
        return Err(e);
    }
    let length = options.check_length(header.length)?;

    // Payload
    let mut payload = Vec::with_capacity(length.min(INITIAL_PAYLOAD_CAPACITY));
    let read = read_exact_len(reader, header.length, &mut payload)?;
    if read < length {
        return Err(truncated(header.frame_len(), (HEADER_SIZE + read) as u64));
    }

    // Payload checksum
    let mut footer = [0u8; CHECKSUM_SIZE];
    let got = read_full(reader, &mut footer)?;
    if got < CHECKSUM_SIZE {
        return Err(truncated(
            header.frame_len(),
            (HEADER_SIZE + length + got) as u64,
        ));
    }

    let expected = decode_checksum(footer);
    let actual = masked_crc32c(&payload);
    if actual != expected {
        #[cfg(feature = "logging")]
        warn!(
            "Payload checksum mismatch on {} byte record: expected {:#010x}, got {:#010x}",
            length, expected, actual
        );
        return Err(RecordError::PayloadChecksumMismatch { expected, actual });
    }

    #[cfg(feature = "logging")]
    debug!("Read record ({} payload bytes)", length);

    Ok(Bytes::from(payload))
}

/// A record decoded from an in-memory buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    /// The record payload
    pub payload: Bytes,

    /// Frame bytes consumed from the start of the buffer
    pub consumed: usize,
}

/// Decode the first record of `data`, copying its payload
///
/// Trailing bytes after the first frame are left untouched; the returned
/// `consumed` count tells the caller where the next frame starts.
pub fn decode_record_from_bytes(data: &[u8]) -> Result<DecodedRecord, RecordError> {
    let (payload, consumed) = parse_frame(data, &ReaderOptions::default())?;
    Ok(DecodedRecord {
        payload: Bytes::copy_from_slice(&data[payload]),
        consumed,
    })
}

/// Decode the first record of `buf` without copying the payload
///
/// The returned payload shares `buf`'s storage.
pub fn decode_record_zero_copy(buf: Bytes) -> Result<DecodedRecord, RecordError> {
    decode_record_zero_copy_with_options(buf, &ReaderOptions::default())
}

/// Zero-copy decode applying `options`
pub fn decode_record_zero_copy_with_options(
    buf: Bytes,
    options: &ReaderOptions,
) -> Result<DecodedRecord, RecordError> {
    let (payload, consumed) = parse_frame(&buf, options)?;
    Ok(DecodedRecord {
        payload: buf.slice(payload),
        consumed,
    })
}

/// Validate the frame at the start of `data`, returning the payload range and
/// the frame size
pub(crate) fn parse_frame(
    data: &[u8],
    options: &ReaderOptions,
) -> Result<(Range<usize>, usize), RecordError> {
    if data.is_empty() {
        return Err(RecordError::EndOfStream);
    }
    if data.len() < HEADER_SIZE {
        return Err(truncated(HEADER_SIZE as u64, data.len() as u64));
    }

    let mut header_buf = [0u8; HEADER_SIZE];
    header_buf.copy_from_slice(&data[..HEADER_SIZE]);
    let header = RecordHeader::decode(&header_buf);
    if let Err(e) = header.verify() {
        #[cfg(feature = "logging")]
        warn!("Rejecting record: {}", e);
        return Err(e);
    }
    let length = options.check_length(header.length)?;

    let available = data.len() as u64;
    if available < header.frame_len() {
        return Err(truncated(header.frame_len(), available));
    }

    let payload = HEADER_SIZE..HEADER_SIZE + length;
    let mut footer = [0u8; CHECKSUM_SIZE];
    footer.copy_from_slice(&data[payload.end..payload.end + CHECKSUM_SIZE]);

    let expected = decode_checksum(footer);
    let actual = masked_crc32c(&data[payload.clone()]);
    if actual != expected {
        #[cfg(feature = "logging")]
        warn!(
            "Payload checksum mismatch on {} byte record: expected {:#010x}, got {:#010x}",
            length, expected, actual
        );
        return Err(RecordError::PayloadChecksumMismatch { expected, actual });
    }

    Ok((payload, FRAME_OVERHEAD + length))
}

fn truncated(expected: u64, actual: u64) -> RecordError {
    #[cfg(feature = "logging")]
    warn!(
        "Truncated record: expected {} bytes, got {}",
        expected, actual
    );
    RecordError::TruncatedRecord { expected, actual }
}

/// Fill `buf` from `reader`, looping over short reads
///
/// Returns the number of bytes read, which is less than `buf.len()` only if
/// the reader hit end of stream (`Ok(0)` or `UnexpectedEof`).
#[cfg(feature = "std")]
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, RecordError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Append up to `length` bytes from `reader` to `buf`, returning the count
///
/// An `UnexpectedEof` from the reader ends the read like `Ok(0)`; the bytes
/// already appended are kept.
#[cfg(feature = "std")]
fn read_exact_len<R: Read>(
    reader: &mut R,
    length: u64,
    buf: &mut Vec<u8>,
) -> Result<usize, RecordError> {
    let start = buf.len();
    match reader.by_ref().take(length).read_to_end(buf) {
        Ok(read) => Ok(read),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(buf.len() - start),
        Err(e) => Err(e.into()),
    }
}

/// Sequential record reader over any [`Read`]
///
/// Tracks how many records were read and the stream offset just past the last
/// valid frame, so a caller that hits corruption can report exactly how much
/// of the stream was recovered.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct RecordReader<R: Read> {
    inner: R,
    options: ReaderOptions,
    records_read: u64,
    position: u64,
}

#[cfg(feature = "std")]
impl<R: Read> RecordReader<R> {
    /// Create a reader starting at `inner`'s current position
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, ReaderOptions::default())
    }

    /// Create a reader with custom options
    pub fn with_options(inner: R, options: ReaderOptions) -> Self {
        Self {
            inner,
            options,
            records_read: 0,
            position: 0,
        }
    }

    /// Read the next record
    pub fn read_record(&mut self) -> Result<Bytes, RecordError> {
        let payload = read_record_with_options(&mut self.inner, &self.options)?;

        self.records_read += 1;
        self.position += (FRAME_OVERHEAD + payload.len()) as u64;
        Ok(payload)
    }

    /// Read the next record and deserialize it
    pub fn read<T: crate::types::RecordSerializable>(&mut self) -> Result<T, RecordError> {
        let payload = self.read_record()?;
        T::from_payload(&payload)
    }

    /// Iterate over the remaining records
    ///
    /// Ends cleanly at end of stream. On any other error the error is yielded
    /// once and iteration stops.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Number of records successfully read
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Bytes consumed by successfully read frames
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reader options in effect
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Unwrap the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Iterator over the records of a [`RecordReader`]
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct Records<'a, R: Read> {
    reader: &'a mut RecordReader<R>,
    done: bool,
}

#[cfg(feature = "std")]
impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Bytes, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_record() {
            Ok(payload) => Some(Ok(payload)),
            Err(RecordError::EndOfStream) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_record;

    #[test]
    fn test_decode_simple_record() {
        let encoded = encode_record(b"Ala ma kota");
        let decoded = decode_record_from_bytes(&encoded).unwrap();

        assert_eq!(decoded.payload.as_ref(), b"Ala ma kota");
        assert_eq!(decoded.consumed, encoded.len());
    }

    #[test]
    fn test_decode_empty_buffer_is_end_of_stream() {
        assert!(matches!(
            decode_record_from_bytes(&[]),
            Err(RecordError::EndOfStream)
        ));
    }

    #[test]
    fn test_decode_short_header_is_truncated() {
        let encoded = encode_record(b"Ala ma kota");
        assert!(matches!(
            decode_record_from_bytes(&encoded[..5]),
            Err(RecordError::TruncatedRecord {
                expected: 12,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_zero_copy_shares_buffer() {
        let mut stream = encode_record(b"first").to_vec();
        stream.extend_from_slice(&encode_record(b"second"));
        let buf = Bytes::from(stream);

        let first = decode_record_zero_copy(buf.clone()).unwrap();
        assert_eq!(first.payload.as_ref(), b"first");

        let second = decode_record_zero_copy(buf.slice(first.consumed..)).unwrap();
        assert_eq!(second.payload.as_ref(), b"second");
        assert_eq!(first.consumed + second.consumed, buf.len());
    }

    #[test]
    fn test_decode_bad_payload_checksum() {
        let mut encoded = encode_record(b"Ala ma kota").to_vec();
        encoded[12] ^= 0x01;

        assert!(matches!(
            decode_record_from_bytes(&encoded),
            Err(RecordError::PayloadChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_bad_length_checksum() {
        let mut encoded = encode_record(b"Ala ma kota").to_vec();
        encoded[..8].copy_from_slice(&6u64.to_le_bytes());

        assert!(matches!(
            decode_record_from_bytes(&encoded),
            Err(RecordError::LengthChecksumMismatch { .. })
        ));
        assert!(matches!(
            decode_record_zero_copy(Bytes::from(encoded)),
            Err(RecordError::LengthChecksumMismatch { .. })
        ));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_read_round_trip() {
        let encoded = encode_record(b"Ala ma kota");
        let mut cursor = std::io::Cursor::new(encoded.to_vec());

        let payload = read_record(&mut cursor).unwrap();
        assert_eq!(payload.as_ref(), b"Ala ma kota");
        assert!(matches!(
            read_record(&mut cursor),
            Err(RecordError::EndOfStream)
        ));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_read_rejects_oversized_record() {
        let encoded = encode_record(&[7u8; 64]);
        let mut cursor = std::io::Cursor::new(encoded.to_vec());
        let options = ReaderOptions::new().max_record_len(32);

        assert!(matches!(
            read_record_with_options(&mut cursor, &options),
            Err(RecordError::RecordTooLarge { length: 64, max: 32 })
        ));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_reader_stops_after_first_error() {
        let mut stream = encode_record(b"good").to_vec();
        let mut bad = encode_record(b"bad!").to_vec();
        bad[13] ^= 0xff;
        stream.extend_from_slice(&bad);
        stream.extend_from_slice(&encode_record(b"unreached"));

        let mut reader = RecordReader::new(std::io::Cursor::new(stream));
        let results: Vec<_> = reader.records().collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().as_ref(), b"good");
        assert!(matches!(
            results[1],
            Err(RecordError::PayloadChecksumMismatch { .. })
        ));
        assert_eq!(reader.records_read(), 1);
        assert_eq!(reader.position(), 20);
    }
}
