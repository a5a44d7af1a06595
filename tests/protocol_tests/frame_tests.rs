//! Frame Tests
//!
//! Tests for reading delimiter-terminated frames from a stream.

use std::io::{BufReader, Cursor, ErrorKind, Read};

use chateau::protocol::{read_frame, Frame, FRAME_DELIMITER};
use chateau::ChateauError;

const MAX: usize = 1024;

// =============================================================================
// Reading Tests
// =============================================================================

#[test]
fn test_read_single_frame() {
    let mut reader = Cursor::new(b"Echo:hello\n".to_vec());

    let frame = read_frame(&mut reader, MAX).unwrap();

    assert_eq!(frame.as_bytes(), b"Echo:hello\n");
    assert_eq!(frame.len(), 11);
}

#[test]
fn test_read_stops_at_first_delimiter() {
    let mut reader = Cursor::new(b"Echo:a\nextra\n".to_vec());

    let frame = read_frame(&mut reader, MAX).unwrap();
    assert_eq!(frame.as_bytes(), b"Echo:a\n");

    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"extra\n");
}

#[test]
fn test_read_without_delimiter_is_eof() {
    let mut reader = Cursor::new(b"Echo:hello".to_vec());

    let result = read_frame(&mut reader, MAX);

    match result {
        Err(ChateauError::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("Expected EOF error, got {:?}", other),
    }
}

#[test]
fn test_read_empty_stream_is_eof() {
    let mut reader = Cursor::new(Vec::new());

    let result = read_frame(&mut reader, MAX);

    assert!(matches!(result, Err(ChateauError::Io(_))));
}

#[test]
fn test_read_frame_too_large() {
    let mut reader = Cursor::new(vec![b'a'; 64]);

    let result = read_frame(&mut reader, 16);

    assert!(matches!(result, Err(ChateauError::FrameTooLarge { limit: 16 })));
}

#[test]
fn test_frame_exactly_at_limit() {
    let mut data = vec![b'a'; 15];
    data.push(FRAME_DELIMITER);
    let mut reader = Cursor::new(data);

    let frame = read_frame(&mut reader, 16).unwrap();

    assert_eq!(frame.len(), 16);
}

#[test]
fn test_read_through_small_buffer() {
    // Delimiter arrives across several fill_buf calls
    let mut reader = BufReader::with_capacity(2, Cursor::new(b"Echo:hello world\n".to_vec()));

    let frame = read_frame(&mut reader, MAX).unwrap();

    assert_eq!(frame.as_bytes(), b"Echo:hello world\n");
}

// =============================================================================
// Payload Tests
// =============================================================================

#[test]
fn test_payload_excludes_delimiter() {
    let frame = Frame::new(b"Echo:hello\n".to_vec());

    assert_eq!(frame.payload(5), b"hello");
}

#[test]
fn test_payload_empty() {
    let frame = Frame::new(b"Echo:\n".to_vec());

    assert_eq!(frame.payload(5), b"");
}

#[test]
fn test_payload_offset_past_end_is_empty() {
    let frame = Frame::new(b"Echo:\n".to_vec());

    assert_eq!(frame.payload(42), b"");
}

#[test]
fn test_payload_end_excludes_delimiter() {
    let frame = Frame::new(b"Echo:hi\n".to_vec());

    assert_eq!(frame.len(), 8);
    assert_eq!(frame.payload_end(), 7);
}

#[test]
fn test_payload_end_without_delimiter() {
    let frame = Frame::new(b"Echo:hi".to_vec());

    assert_eq!(frame.payload_end(), 7);
}

#[test]
fn test_payload_end_of_empty_payload_equals_offset() {
    let frame = Frame::new(b"Echo:\n".to_vec());

    assert_eq!(frame.payload_end(), 5);
}
