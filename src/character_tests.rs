//! Tests for the character inspector

use super::*;
use crate::buffer::GapBuffer;
use crate::config::Config;
use crate::position::{FileFormat, Position};

fn buffer_with(bytes: &[u8]) -> GapBuffer {
    let mut buf = GapBuffer::new(16).unwrap();
    buf.add(bytes).unwrap();
    buf
}

fn info_at(buf: &GapBuffer, offset: usize, format: FileFormat, config: &Config) -> CharInfo {
    let mut pos = Position::new(buf, format, config);
    pos.offset = offset;
    char_info(CharInfoProperties::ScreenLength, &pos)
}

#[test]
fn test_ascii_printable() {
    let buf = buffer_with(b"a");
    let config = Config::default();
    let info = info_at(&buf, 0, FileFormat::Unix, &config);

    assert_eq!(info.byte_length, 1);
    assert_eq!(info.screen_length, 1);
    assert!(info.is_valid);
    assert!(info.is_printable);
}

#[test]
fn test_newline_has_no_width() {
    let buf = buffer_with(b"\n");
    let config = Config::default();
    let info = info_at(&buf, 0, FileFormat::Unix, &config);

    assert_eq!(info.byte_length, 1);
    assert_eq!(info.screen_length, 0);
}

#[test]
fn test_carriage_return_widths() {
    let buf = buffer_with(b"\r\n");
    let config = Config::default();

    // Part of the terminator under Windows, a control char elsewhere
    let info = info_at(&buf, 0, FileFormat::Windows, &config);
    assert_eq!(info.screen_length, 0);

    let info = info_at(&buf, 0, FileFormat::Unix, &config);
    assert_eq!(info.screen_length, 2);

    let lone = buffer_with(b"\rx");
    let info = info_at(&lone, 0, FileFormat::Windows, &config);
    assert_eq!(info.screen_length, 2);
}

#[test]
fn test_tab_width_depends_on_column() {
    let buf = buffer_with(b"\t");
    let config = Config::default();

    let mut pos = Position::new(&buf, FileFormat::Unix, &config);
    let info = char_info(CharInfoProperties::ScreenLength, &pos);
    assert_eq!(info.screen_length, 8);

    pos.col = 4;
    let info = char_info(CharInfoProperties::ScreenLength, &pos);
    assert_eq!(info.screen_length, 5);

    pos.col = 8;
    let info = char_info(CharInfoProperties::ScreenLength, &pos);
    assert_eq!(info.screen_length, 1);

    let narrow = Config::new(4);
    let mut pos = Position::new(&buf, FileFormat::Unix, &narrow);
    pos.col = 2;
    let info = char_info(CharInfoProperties::ScreenLength, &pos);
    assert_eq!(info.screen_length, 3);
}

#[test]
fn test_control_chars_not_printable() {
    let config = Config::default();

    for byte in [0x01u8, 0x1F, 0x7F] {
        let buf = buffer_with(&[byte]);
        let info = info_at(&buf, 0, FileFormat::Unix, &config);
        assert_eq!(info.byte_length, 1);
        assert_eq!(info.screen_length, 2);
        assert!(!info.is_printable);
    }
}

#[test]
fn test_valid_multibyte() {
    let config = Config::default();

    let buf = buffer_with("é".as_bytes());
    let info = info_at(&buf, 0, FileFormat::Unix, &config);
    assert_eq!(info.byte_length, 2);
    assert_eq!(info.screen_length, 1);
    assert!(info.is_valid);

    let buf = buffer_with("漢".as_bytes());
    let info = info_at(&buf, 0, FileFormat::Unix, &config);
    assert_eq!(info.byte_length, 3);
    assert_eq!(info.screen_length, 2);
    assert!(info.is_valid);

    let buf = buffer_with("🦀".as_bytes());
    let info = info_at(&buf, 0, FileFormat::Unix, &config);
    assert_eq!(info.byte_length, 4);
    assert_eq!(info.screen_length, 2);
    assert!(info.is_valid);
}

#[test]
fn test_invalid_lead_bytes() {
    let config = Config::default();

    // 0xC0, 0xC1 and 0xF5+ can never start a character
    for lead in [0xC0u8, 0xC1, 0xF5, 0xFF] {
        let buf = buffer_with(&[lead, b'a']);
        let info = info_at(&buf, 0, FileFormat::Unix, &config);
        assert!(!info.is_valid);
        assert_eq!(info.byte_length, 1);
        assert_eq!(info.screen_length, 1);
    }
}

#[test]
fn test_overlong_and_out_of_range() {
    let config = Config::default();

    // Overlong E0 80 80
    let buf = buffer_with(&[0xE0, 0x80, 0x80]);
    assert!(!info_at(&buf, 0, FileFormat::Unix, &config).is_valid);

    // Overlong F0 8F ...
    let buf = buffer_with(&[0xF0, 0x8F, 0x80, 0x80]);
    assert!(!info_at(&buf, 0, FileFormat::Unix, &config).is_valid);

    // Beyond U+10FFFF: F4 90 ...
    let buf = buffer_with(&[0xF4, 0x90, 0x80, 0x80]);
    assert!(!info_at(&buf, 0, FileFormat::Unix, &config).is_valid);

    // F4 8F stays in range
    let buf = buffer_with(&[0xF4, 0x8F, 0xBF, 0xBF]);
    assert!(info_at(&buf, 0, FileFormat::Unix, &config).is_valid);
}

#[test]
fn test_truncated_sequence_is_invalid() {
    let config = Config::default();
    let buf = buffer_with(&[0xC3]);
    let info = info_at(&buf, 0, FileFormat::Unix, &config);

    assert!(!info.is_valid);
    assert_eq!(info.byte_length, 1);
}

#[test]
fn test_continuation_run_collapses() {
    let config = Config::default();
    let buf = buffer_with(&[0x80, 0x80, 0x80, b'a']);
    let info = info_at(&buf, 0, FileFormat::Unix, &config);

    assert!(!info.is_valid);
    assert_eq!(info.byte_length, 3);
    assert_eq!(info.screen_length, 1);
}

#[test]
fn test_byte_length_only() {
    let config = Config::default();
    let buf = buffer_with("é".as_bytes());

    let pos = Position::new(&buf, FileFormat::Unix, &config);
    let info = char_info(CharInfoProperties::ByteLength, &pos);

    assert_eq!(info.byte_length, 2);
    assert_eq!(info.screen_length, 0);
    assert!(!info.is_printable);
}

#[test]
fn test_previous_char_offset() {
    let config = Config::default();
    let buf = buffer_with("a漢b".as_bytes());

    let mut pos = Position::new(&buf, FileFormat::Unix, &config);
    pos.offset = 5;
    assert_eq!(previous_char_offset(&pos), 1);

    pos.offset = 4;
    assert_eq!(previous_char_offset(&pos), 3);

    pos.offset = 1;
    assert_eq!(previous_char_offset(&pos), 1);

    pos.offset = 0;
    assert_eq!(previous_char_offset(&pos), 0);
}
