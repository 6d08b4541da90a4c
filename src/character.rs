//! UTF-8 character inspection over a gap buffer
//!
//! Reports, for the character at a buffer position, how many bytes it
//! occupies, how many screen columns it takes, and whether it is valid
//! UTF-8 and printable. Invalid sequences never stall navigation: a bad
//! lead byte advances by one, and a run of stray continuation bytes
//! collapses into a single replacement-character cell.

use crate::buffer::GapBuffer;
use crate::position::{FileFormat, Position};
use unicode_width::UnicodeWidthChar;

/// Which fields of [`CharInfo`] the caller needs populated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharInfoProperties {
    /// Only `byte_length` is required
    ByteLength,
    /// `screen_length`, `is_valid` and `is_printable` as well
    ScreenLength,
}

/// Description of the character at a buffer position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharInfo {
    /// Bytes the character occupies in the buffer
    pub byte_length: usize,
    /// Screen columns the character occupies at this position
    pub screen_length: usize,
    /// Whether the bytes form valid UTF-8
    pub is_valid: bool,
    /// Whether the character renders as itself rather than a control
    /// placeholder
    pub is_printable: bool,
}

/// Inspect the character at `pos`. Only the fields requested by
/// `properties` are populated; the rest stay zeroed.
#[must_use]
pub fn char_info(properties: CharInfoProperties, pos: &Position<'_>) -> CharInfo {
    let mut info = CharInfo::default();
    let c = pos.data().byte_at(pos.offset);

    if c < 128 {
        ascii_char_info(&mut info, properties, pos, c);
        return info;
    }

    match utf8_char_length(pos.data(), pos.offset) {
        Some(byte_length) => {
            info.is_valid = true;
            info.byte_length = byte_length;
        }
        None => {
            info.byte_length = invalid_run_length(pos.data(), pos.offset);
        }
    }

    if properties == CharInfoProperties::ScreenLength {
        info.is_printable = true;

        if !info.is_valid {
            info.screen_length = 1;
        } else {
            let mut bytes = [0u8; 4];
            pos.data().get_range(pos.offset, &mut bytes[..info.byte_length]);

            let code_point = utf8_code_point(&bytes, info.byte_length);
            info.screen_length = char::from_u32(code_point)
                .and_then(UnicodeWidthChar::width)
                .unwrap_or(1);
        }
    }

    info
}

fn ascii_char_info(
    info: &mut CharInfo,
    properties: CharInfoProperties,
    pos: &Position<'_>,
    c: u8,
) {
    debug_assert!(c < 128);

    info.is_valid = true;
    info.byte_length = 1;

    if properties != CharInfoProperties::ScreenLength {
        return;
    }

    info.is_printable = true;

    if c == b'\n' {
        info.screen_length = 0;
    } else if c == b'\r'
        && pos.format() == FileFormat::Windows
        && pos.data().byte_at(pos.offset + 1) == b'\n'
    {
        info.screen_length = 0;
    } else if c == b'\t' {
        let tab_width = pos.config().tab_width();
        info.screen_length = tab_width - ((pos.col - 1) % tab_width);
    } else if c < 32 || c == 127 {
        info.screen_length = 2;
        info.is_printable = false;
    } else {
        info.screen_length = 1;
    }
}

/// Byte length of the character starting at `offset`, for navigation that
/// does not care about widths
pub(crate) fn char_byte_length(data: &GapBuffer, offset: usize) -> usize {
    let c = data.byte_at(offset);

    if c < 128 {
        return 1;
    }

    match utf8_char_length(data, offset) {
        Some(byte_length) => byte_length,
        None => invalid_run_length(data, offset),
    }
}

/// Validate the non-ASCII sequence starting at `offset` against UTF-8
/// rules, returning its byte length if valid.
///
/// Lead bytes `0xC0`/`0xC1` and `>= 0xF5` are rejected, as are overlong
/// encodings (`0xE0` with a second byte below `0xA0`, `0xF0` below
/// `0x90`), code points beyond U+10FFFF (`0xF4` with a second byte of
/// `0x90` or above), and sequences truncated by the buffer end.
fn utf8_char_length(data: &GapBuffer, offset: usize) -> Option<usize> {
    let byte = data.byte_at(offset);
    let space_left = data.len() - offset;

    let byte_length = if byte < 0x80 {
        1
    } else if byte < 0xC2 {
        return None;
    } else if byte < 0xE0 {
        2
    } else if byte < 0xF0 {
        if 3 > space_left {
            return None;
        }

        let byte2 = data.byte_at(offset + 1);
        if byte == 0xE0 && byte2 < 0xA0 {
            return None;
        }

        3
    } else if byte < 0xF5 {
        if 4 > space_left {
            return None;
        }

        let byte2 = data.byte_at(offset + 1);
        if (byte == 0xF0 && byte2 < 0x90) || (byte == 0xF4 && byte2 >= 0x90) {
            return None;
        }

        4
    } else {
        return None;
    };

    if byte_length > space_left {
        return None;
    }

    for k in 1..byte_length {
        if data.byte_at(offset + k) & 0xC0 != 0x80 {
            return None;
        }
    }

    Some(byte_length)
}

/// Length of the damaged region starting at `offset`: the lead byte plus
/// any continuation bytes that follow it
fn invalid_run_length(data: &GapBuffer, offset: usize) -> usize {
    let mut byte_length = 1;

    while offset + byte_length < data.len()
        && data.byte_at(offset + byte_length) & 0xC0 == 0x80
    {
        byte_length += 1;
    }

    byte_length
}

/// Assemble the code point from a validated sequence
fn utf8_code_point(bytes: &[u8; 4], byte_length: usize) -> u32 {
    match byte_length {
        1 => u32::from(bytes[0]),
        2 => (u32::from(bytes[0] & 0x1F) << 6) + u32::from(bytes[1] & 0x3F),
        3 => {
            (u32::from(bytes[0] & 0x0F) << 12)
                + (u32::from(bytes[1] & 0x3F) << 6)
                + u32::from(bytes[2] & 0x3F)
        }
        4 => {
            (u32::from(bytes[0] & 0x07) << 18)
                + (u32::from(bytes[1] & 0x3F) << 12)
                + (u32::from(bytes[2] & 0x3F) << 6)
                + u32::from(bytes[3] & 0x3F)
        }
        _ => 0,
    }
}

/// Number of bytes between `pos` and the lead byte of the previous
/// character, found by scanning backwards past continuation bytes
#[must_use]
pub fn previous_char_offset(pos: &Position<'_>) -> usize {
    if pos.offset == 0 {
        return 0;
    }

    let mut offset = pos.offset;

    loop {
        offset -= 1;
        if offset == 0 || pos.data().byte_at(offset) & 0xC0 != 0x80 {
            break;
        }
    }

    pos.offset - offset
}

#[cfg(test)]
#[path = "character_tests.rs"]
mod tests;
