//! Whole-stream verification
//!
//! Walks a buffer frame by frame from offset zero and stops at the first
//! frame that fails to decode. No attempt is made to find a later valid frame.

use crate::decoder::parse_frame;
use crate::error::RecordError;
use crate::types::ReaderOptions;
use alloc::vec::Vec;
use bytes::Bytes;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// A record found at a specific offset in the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedRecord {
    /// Byte offset where the frame starts
    pub offset: usize,

    /// The record payload
    pub payload: Bytes,

    /// Total size of the frame in bytes
    pub size: usize,
}

/// Outcome of walking a stream
#[derive(Debug, Default)]
pub struct StreamReport {
    /// Total bytes in the stream
    pub bytes_total: usize,

    /// Number of valid records before the end or the first error
    pub records: usize,

    /// Sum of payload lengths of the valid records
    pub payload_bytes: usize,

    /// Offset just past the last valid frame
    pub valid_bytes: usize,

    /// The error that stopped the walk; `None` for a clean end of stream
    pub error: Option<RecordError>,
}

impl StreamReport {
    /// True if every byte of the stream belongs to a valid frame
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }

    /// Share of the stream covered by valid frames, as a percentage
    pub fn recovery_rate(&self) -> f64 {
        if self.bytes_total == 0 {
            100.0
        } else {
            (self.valid_bytes as f64 / self.bytes_total as f64) * 100.0
        }
    }
}

/// Verify every frame in `data` without keeping payloads
pub fn verify_stream(data: &[u8]) -> StreamReport {
    walk(data, &ReaderOptions::default(), |_, _| {})
}

/// Split `buf` into records, sharing its storage
///
/// Returns the records that decoded cleanly, in stream order, and the report
/// describing where and why the walk stopped.
pub fn read_stream(buf: Bytes) -> (Vec<LocatedRecord>, StreamReport) {
    read_stream_with_options(buf, &ReaderOptions::default())
}

/// [`read_stream`] applying `options`
pub fn read_stream_with_options(
    buf: Bytes,
    options: &ReaderOptions,
) -> (Vec<LocatedRecord>, StreamReport) {
    let mut records = Vec::new();
    let report = walk(&buf, options, |offset, (payload, size)| {
        records.push(LocatedRecord {
            offset,
            payload: buf.slice(offset + payload.start..offset + payload.end),
            size,
        });
    });
    (records, report)
}

fn walk<F>(data: &[u8], options: &ReaderOptions, mut on_record: F) -> StreamReport
where
    F: FnMut(usize, (core::ops::Range<usize>, usize)),
{
    let mut report = StreamReport {
        bytes_total: data.len(),
        ..Default::default()
    };

    #[cfg(feature = "logging")]
    debug!("Verifying stream of {} bytes", data.len());

    let mut pos = 0;
    loop {
        match parse_frame(&data[pos..], options) {
            Ok((payload, size)) => {
                report.records += 1;
                report.payload_bytes += payload.len();
                on_record(pos, (payload, size));
                pos += size;
                report.valid_bytes = pos;
            }
            Err(RecordError::EndOfStream) => break,
            Err(e) => {
                #[cfg(feature = "logging")]
                warn!("Stream verification stopped at offset {}: {}", pos, e);

                report.error = Some(e);
                break;
            }
        }
    }

    #[cfg(feature = "logging")]
    debug!(
        "Verification complete: {} valid records in {} of {} bytes",
        report.records, report.valid_bytes, report.bytes_total
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_record;

    fn stream_of(payloads: &[&[u8]]) -> Vec<u8> {
        let mut stream = Vec::new();
        for payload in payloads {
            stream.extend_from_slice(&encode_record(payload));
        }
        stream
    }

    #[test]
    fn test_verify_clean_stream() {
        let stream = stream_of(&[b"one", b"two", b""]);
        let report = verify_stream(&stream);

        assert!(report.is_clean());
        assert_eq!(report.records, 3);
        assert_eq!(report.payload_bytes, 6);
        assert_eq!(report.valid_bytes, stream.len());
        assert_eq!(report.recovery_rate(), 100.0);
    }

    #[test]
    fn test_verify_empty_stream() {
        let report = verify_stream(&[]);
        assert!(report.is_clean());
        assert_eq!(report.records, 0);
    }

    #[test]
    fn test_verify_stops_at_truncated_tail() {
        let mut stream = stream_of(&[b"one", b"two"]);
        let full = stream.len();
        stream.truncate(full - 2);

        let report = verify_stream(&stream);
        assert_eq!(report.records, 1);
        assert_eq!(report.valid_bytes, 19);
        assert!(matches!(
            report.error,
            Some(RecordError::TruncatedRecord {
                expected: 19,
                actual: 17
            })
        ));
    }

    #[test]
    fn test_read_stream_offsets() {
        let stream = Bytes::from(stream_of(&[b"alpha", b"beta"]));
        let (records, report) = read_stream(stream);

        assert!(report.is_clean());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].offset, 0);
        assert_eq!(records[0].payload.as_ref(), b"alpha");
        assert_eq!(records[1].offset, 21);
        assert_eq!(records[1].payload.as_ref(), b"beta");
        assert_eq!(records[1].size, 20);
    }
}
