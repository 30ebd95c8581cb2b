//! Fuzz entry points for the tfrecord-core decoders
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Call these functions from a `fuzz_target!` body

use std::io::Cursor;

use bytes::Bytes;
use tfrecord_core::RecordReader;

pub fn fuzz_decode(data: &[u8]) {
    use tfrecord_core::decoder::{decode_record_from_bytes, decode_record_zero_copy};

    // Try to decode - should never panic
    let _ = decode_record_from_bytes(data);
    let _ = decode_record_zero_copy(Bytes::copy_from_slice(data));
}

/// Read every record from `data`, checking the reader's bookkeeping
pub fn fuzz_read_stream(data: &[u8]) {
    let mut reader = RecordReader::new(Cursor::new(data));
    let mut payload_bytes = 0u64;

    loop {
        match reader.read_record() {
            Ok(payload) => payload_bytes += payload.len() as u64,
            // clean end and corruption both stop the walk
            Err(_) => break,
        }
    }

    assert!(reader.position() <= data.len() as u64);
    assert_eq!(reader.position(), payload_bytes + 16 * reader.records_read());
}

/// Compare the streaming reader against the in-memory verifier
pub fn fuzz_verify(data: &[u8]) {
    use tfrecord_core::verify::verify_stream;

    let report = verify_stream(data);
    let mut reader = RecordReader::new(Cursor::new(data));
    let read = reader.records().take_while(Result::is_ok).count();

    assert_eq!(report.records, read);
    assert_eq!(report.valid_bytes as u64, reader.position());
}
