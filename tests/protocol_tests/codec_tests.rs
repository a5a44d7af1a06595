//! Codec Tests
//!
//! Tests for handler name extraction and payload decoding.

use chateau::message::{Blob, Message, RequestType, Text};
use chateau::protocol::{Codec, DelimitedCodec, DEFAULT_SEPARATOR};
use chateau::ChateauError;

// =============================================================================
// Handler Name Extraction Tests
// =============================================================================

#[test]
fn test_extract_handler_name() {
    let codec = DelimitedCodec::default();

    let (name, offset) = codec.extract_handler_name(b"Echo:hello\n").unwrap();

    assert_eq!(name, "Echo");
    assert_eq!(offset, 5);
}

#[test]
fn test_extract_with_empty_payload() {
    let codec = DelimitedCodec::default();
    let frame = b"Echo:\n";

    let (name, offset) = codec.extract_handler_name(frame).unwrap();

    assert_eq!(name, "Echo");
    assert_eq!(offset, 5);
    assert!(offset < frame.len());
}

#[test]
fn test_extract_stops_at_first_separator() {
    let codec = DelimitedCodec::default();

    let (name, offset) = codec.extract_handler_name(b"Echo:a:b\n").unwrap();

    assert_eq!(name, "Echo");
    assert_eq!(offset, 5);
}

#[test]
fn test_extract_missing_separator() {
    let codec = DelimitedCodec::default();

    let result = codec.extract_handler_name(b"Echo\n");

    assert!(matches!(result, Err(ChateauError::MalformedFrame(_))));
}

#[test]
fn test_extract_separator_after_delimiter_ignored() {
    let codec = DelimitedCodec::default();

    let result = codec.extract_handler_name(b"Echo\n:x");

    assert!(matches!(result, Err(ChateauError::MalformedFrame(_))));
}

#[test]
fn test_extract_empty_name() {
    let codec = DelimitedCodec::default();

    let result = codec.extract_handler_name(b":hello\n");

    assert!(matches!(result, Err(ChateauError::MalformedFrame(_))));
}

#[test]
fn test_extract_non_utf8_name() {
    let codec = DelimitedCodec::default();

    let result = codec.extract_handler_name(b"\xff\xfe:hello\n");

    assert!(matches!(result, Err(ChateauError::MalformedFrame(_))));
}

#[test]
fn test_custom_separator() {
    let codec = DelimitedCodec::new(b'#');

    let (name, offset) = codec.extract_handler_name(b"Get:User#42\n").unwrap();

    assert_eq!(codec.separator(), b'#');
    assert_eq!(name, "Get:User");
    assert_eq!(offset, 9);
}

// =============================================================================
// Frame Encoding Tests
// =============================================================================

#[test]
fn test_encode_frame() {
    let codec = DelimitedCodec::default();

    let frame = codec.encode_frame("Echo", b"hello");

    assert_eq!(frame, b"Echo:hello\n");
    assert_eq!(DEFAULT_SEPARATOR, b':');
}

#[test]
fn test_encoded_frame_extracts_back() {
    let codec = DelimitedCodec::new(b'|');
    let frame = codec.encode_frame("Sum", b"1,2,3");

    let (name, offset) = codec.extract_handler_name(&frame).unwrap();

    assert_eq!(name, "Sum");
    assert_eq!(&frame[offset..frame.len() - 1], b"1,2,3");
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_text() {
    let codec = DelimitedCodec::default();

    let msg = codec.decode_message(b"hello", &RequestType::of::<Text>()).unwrap();

    assert_eq!(msg.marshal().unwrap(), b"hello");
}

#[test]
fn test_decode_blob_accepts_any_bytes() {
    let codec = DelimitedCodec::default();

    let msg = codec
        .decode_message(&[0x00, 0xff, 0x10], &RequestType::of::<Blob>())
        .unwrap();

    assert_eq!(msg.marshal().unwrap(), vec![0x00, 0xff, 0x10]);
}

#[test]
fn test_decode_failure_names_request_type() {
    let codec = DelimitedCodec::default();

    let result = codec.decode_message(b"\xff", &RequestType::of::<Text>());

    match result {
        Err(ChateauError::Decode(msg)) => assert!(msg.contains("Text")),
        other => panic!("Expected decode error, got {:?}", other.map(|_| ())),
    }
}
