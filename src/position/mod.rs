//! Line- and column-aware positions over a gap buffer
//!
//! A [`Position`] is an `(offset, line, col)` triple kept consistent while
//! navigating character by character, line by line, or by re-anchoring to
//! an arbitrary offset or line/column pair. Columns account for on-screen
//! widths: tabs expand to the next tab stop, control characters render as
//! two cells, and line terminators take no width.
//!
//! Lines and columns are 1-based. Under [`FileFormat::Windows`] a `\r\n`
//! pair is a single line terminator; other formats treat `\n` alone as
//! the terminator.

use crate::buffer::GapBuffer;
use crate::character::{self, CharInfoProperties};
use crate::config::Config;
use std::cmp::Ordering;

/// Line ending convention of the stored text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `\n` line endings
    Unix,
    /// `\r\n` line endings
    Windows,
    /// `\r` line endings
    Mac,
}

/// A navigable position in a buffer.
///
/// Positions borrow the buffer they address, so they cannot outlive an
/// edit: after any mutation the position must be re-resolved, typically
/// with [`Position::from_offset`].
#[derive(Clone, Copy)]
pub struct Position<'a> {
    data: &'a GapBuffer,
    format: FileFormat,
    config: &'a Config,
    /// Byte offset into the buffer
    pub offset: usize,
    /// 1-based line number of `offset`
    pub line: usize,
    /// 1-based screen column of `offset` within its line
    pub col: usize,
}

/// Where a target lies relative to the cheap anchors we can walk from
enum NearestPos {
    BufferStart,
    KnownPos,
    BufferEnd,
}

fn correct_line(line: usize, max_line: usize) -> usize {
    if line == 0 {
        1
    } else {
        line.min(max_line)
    }
}

fn correct_col(col: usize) -> usize {
    if col == 0 {
        1
    } else {
        col
    }
}

impl<'a> Position<'a> {
    /// Position at the start of `data`
    pub fn new(data: &'a GapBuffer, format: FileFormat, config: &'a Config) -> Self {
        Self {
            data,
            format,
            config,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    /// The underlying buffer
    #[must_use]
    pub fn data(&self) -> &'a GapBuffer {
        self.data
    }

    /// The line ending convention this position navigates under
    #[must_use]
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// The configuration consulted for tab widths
    #[must_use]
    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Byte at this position, `0` at the buffer end
    #[must_use]
    pub fn get_char(&self) -> u8 {
        self.data.byte_at(self.offset)
    }

    fn is_char_before(&self, offset: usize, ch: u8) -> bool {
        self.offset >= offset && self.data.byte_at(self.offset - offset) == ch
    }

    /// Order two positions by line, then column
    #[must_use]
    pub fn compare(&self, other: &Position<'_>) -> Ordering {
        if self.line == other.line {
            self.col.cmp(&other.col)
        } else {
            self.line.cmp(&other.line)
        }
    }

    /// The earlier of two positions
    #[must_use]
    pub fn min(self, other: Position<'a>) -> Position<'a> {
        if self.compare(&other) == Ordering::Less {
            self
        } else {
            other
        }
    }

    /// The later of two positions
    #[must_use]
    pub fn max(self, other: Position<'a>) -> Position<'a> {
        if self.compare(&other) == Ordering::Greater {
            self
        } else {
            other
        }
    }

    #[must_use]
    pub fn at_line_start(&self) -> bool {
        if self.offset == 0 {
            return true;
        }

        self.data.byte_at(self.offset - 1) == b'\n'
    }

    #[must_use]
    pub fn at_line_end(&self) -> bool {
        let buffer_len = self.data.len();

        if self.offset == buffer_len {
            return true;
        }

        if self.format == FileFormat::Windows
            && self.get_char() == b'\r'
            && self.offset + 1 < buffer_len
            && self.data.byte_at(self.offset + 1) == b'\n'
        {
            return true;
        }

        self.get_char() == b'\n'
    }

    #[must_use]
    pub fn on_empty_line(&self) -> bool {
        self.at_line_start() && self.at_line_end()
    }

    #[must_use]
    pub fn on_whitespace_line(&self) -> bool {
        let mut tmp = *self;
        tmp.to_line_start();

        while !tmp.at_line_end() {
            if !tmp.get_char().is_ascii_whitespace() {
                return false;
            }
            tmp.next_char();
        }

        true
    }

    #[must_use]
    pub fn at_first_line(&self) -> bool {
        self.line == 1
    }

    #[must_use]
    pub fn at_last_line(&self) -> bool {
        self.line == self.data.lines() + 1
    }

    #[must_use]
    pub fn at_buffer_start(&self) -> bool {
        self.at_first_line() && self.at_line_start()
    }

    #[must_use]
    pub fn at_buffer_end(&self) -> bool {
        self.at_last_line() && self.at_line_end()
    }

    #[must_use]
    pub fn at_buffer_extreme(&self) -> bool {
        self.at_buffer_start() || self.at_buffer_end()
    }

    /// Advance one character. At a line end the whole terminator is
    /// consumed; at the buffer end this is a no-op.
    pub fn next_char(&mut self) {
        if self.at_buffer_end() {
            return;
        }

        if self.at_line_end() {
            if self.format == FileFormat::Windows && self.get_char() == b'\r' {
                self.offset += 1;
            }

            self.offset += 1;
            self.line += 1;
            self.col = 1;
        } else {
            let info = character::char_info(CharInfoProperties::ScreenLength, self);
            self.offset += info.byte_length;
            self.col += info.screen_length;
        }
    }

    /// Step back one character. At a line start the previous line's
    /// terminator is crossed and the column recalculated; at the buffer
    /// start this is a no-op.
    pub fn prev_char(&mut self) {
        if self.at_buffer_start() {
            return;
        }

        if self.at_line_start() {
            self.offset -= 1;
            self.line -= 1;

            if self.format == FileFormat::Windows && self.is_char_before(1, b'\r') {
                self.offset -= 1;
            }

            self.recalc_col();
        } else {
            let prev_offset = character::previous_char_offset(self);
            self.offset -= prev_offset;

            if self.get_char() == b'\t' {
                // Tab width depends on the column it starts in
                self.recalc_col();
            } else {
                let mut info = character::char_info(CharInfoProperties::ScreenLength, self);

                if info.byte_length == prev_offset {
                    self.col -= info.screen_length;
                } else {
                    // Invalid UTF-8 region: the continuation-byte scan
                    // jumped further back than one character. Walk
                    // forwards through the damage until the counts agree.
                    let mut remaining_bytes = prev_offset - info.byte_length;

                    while remaining_bytes > 0 {
                        self.offset += info.byte_length;
                        info = character::char_info(CharInfoProperties::ScreenLength, self);
                        remaining_bytes -= info.byte_length.min(remaining_bytes);
                    }

                    self.col -= info.screen_length.min(self.col - 1);
                }
            }
        }
    }

    /// Move to the first byte of the current line
    pub fn to_line_start(&mut self) {
        if self.at_line_start() {
            self.col = 1;
            return;
        }

        match self.data.find_prev(self.offset, b'\n') {
            Some(newline) => self.offset = newline + 1,
            None => self.offset = 0,
        }

        self.col = 1;
    }

    /// Move to the line terminator of the current line, or the buffer end
    /// on the last line. Under Windows format this stops before the `\r`
    /// of a `\r\n` pair.
    pub fn to_line_end(&mut self) {
        if self.at_line_end() {
            return;
        }

        let line_end_offset = match self.data.find_next(self.offset, b'\n') {
            Some(mut newline) => {
                if self.format == FileFormat::Windows
                    && newline > 0
                    && self.data.byte_at(newline - 1) == b'\r'
                {
                    newline -= 1;
                }
                newline
            }
            None => self.data.len(),
        };

        self.calc_new_col(line_end_offset);
    }

    /// Re-derive the column by scanning forward from the line start
    pub fn recalc_col(&mut self) {
        let mut tmp = *self;
        tmp.to_line_start();
        tmp.calc_new_col(self.offset);
        *self = tmp;
    }

    fn calc_new_col(&mut self, new_offset: usize) {
        while self.offset < new_offset {
            let info = character::char_info(CharInfoProperties::ScreenLength, self);
            self.col += info.screen_length;
            self.offset += info.byte_length;
        }
    }

    /// Move to the start of the next line. Fails on the last line.
    pub fn next_line(&mut self) -> bool {
        match self.data.find_next(self.offset, b'\n') {
            Some(newline) => {
                self.offset = newline + 1;
                self.line += 1;
                self.col = 1;
                true
            }
            None => false,
        }
    }

    /// Move to the start of the previous line. On line 2 this snaps to
    /// the buffer start. Fails on the first line.
    pub fn prev_line(&mut self) -> bool {
        match self.data.find_prev(self.offset, b'\n') {
            Some(newline) => {
                match self.data.find_prev(newline, b'\n') {
                    Some(prev_newline) => {
                        self.offset = prev_newline + 1;
                        self.line -= 1;
                        self.col = 1;
                    }
                    None => self.to_buffer_start(),
                }
                true
            }
            None => false,
        }
    }

    pub fn to_buffer_start(&mut self) {
        self.offset = 0;
        self.line = 1;
        self.col = 1;
    }

    pub fn to_buffer_end(&mut self) {
        self.offset = self.data.len();
        // lines() counts line endings, so zero endings still means line 1
        self.line = self.data.lines() + 1;
        self.recalc_col();
    }

    /// Walk forwards by whole lines to `offset`, then fix up the column
    pub fn advance_to_offset(&mut self, offset: usize) {
        let offset = offset.min(self.data.len());
        let mut tmp = *self;

        while tmp.offset < offset {
            *self = tmp;

            if !tmp.next_line() {
                break;
            }
        }

        if tmp.offset == offset {
            self.line = tmp.line;
        }

        self.offset = offset;
        self.recalc_col();
    }

    /// Walk backwards by whole lines to `offset`, then fix up the column
    pub fn reverse_to_offset(&mut self, offset: usize) {
        let mut tmp = *self;
        tmp.to_line_start();

        while tmp.offset > offset {
            *self = tmp;

            if !tmp.prev_line() {
                break;
            }
        }

        if tmp.offset <= offset {
            self.line = tmp.line;
        }

        self.offset = offset;
        self.recalc_col();
    }

    /// Move forwards to the start of line `line`, clamped to the last line
    pub fn advance_to_line(&mut self, line: usize) {
        let lines = self.data.lines() + 1;
        let line = correct_line(line, lines);

        while self.line < line {
            if !self.next_line() {
                break;
            }
        }
    }

    /// Move backwards to line `line`, clamped to the last line. With
    /// `end_of_line` set, stop one line later and snap back one
    /// character, landing on the target line's terminator.
    pub fn reverse_to_line(&mut self, line: usize, end_of_line: bool) {
        let lines = self.data.lines() + 1;
        let line = correct_line(line, lines);
        let stop = if end_of_line { line + 1 } else { line };

        while self.line > stop {
            if !self.prev_line() {
                break;
            }
        }

        // Snap only when the walk stopped above the target; a position
        // already inside the target line stays put for column moves
        if end_of_line && self.line > line {
            self.to_line_start();
            self.prev_char();
        }
    }

    /// Move forwards within the current line until column `col`, clamped
    /// to the line end
    pub fn advance_to_col(&mut self, col: usize) {
        let col = correct_col(col);

        while self.col < col && !self.at_line_end() {
            self.next_char();
        }
    }

    /// Move backwards within the current line until column `col`, clamped
    /// to the line start
    pub fn reverse_to_col(&mut self, col: usize) {
        let col = correct_col(col);

        while self.col > col && !self.at_line_start() {
            self.prev_char();
        }
    }

    pub fn advance_to_line_col(&mut self, line: usize, col: usize) {
        let lines = self.data.lines() + 1;
        let line = correct_line(line, lines);
        let col = correct_col(col);

        self.advance_to_line(line);
        self.advance_to_col(col);
    }

    pub fn reverse_to_line_col(&mut self, line: usize, col: usize) {
        let lines = self.data.lines() + 1;
        let line = correct_line(line, lines);
        let col = correct_col(col);

        self.reverse_to_line(line, true);
        self.reverse_to_col(col);
    }

    /// Resolve `offset` to a full position by walking from the nearest of
    /// the buffer start, `known`, and the buffer end
    #[must_use]
    pub fn from_offset(offset: usize, known: &Position<'a>) -> Position<'a> {
        let buffer_len = known.data.len();
        let offset = offset.min(buffer_len);
        let mut pos = *known;

        match nearest_pos(offset, 0, known.offset, buffer_len) {
            NearestPos::BufferEnd => {
                pos.to_buffer_end();
                pos.reverse_to_offset(offset);
            }
            NearestPos::KnownPos => match known.offset.cmp(&offset) {
                Ordering::Greater => pos.reverse_to_offset(offset),
                Ordering::Less => pos.advance_to_offset(offset),
                Ordering::Equal => {}
            },
            NearestPos::BufferStart => {
                pos.to_buffer_start();
                pos.advance_to_offset(offset);
            }
        }

        pos
    }

    /// Resolve a line/column pair to a full position by walking from the
    /// nearest of the buffer start, `known`, and the buffer end
    #[must_use]
    pub fn from_line_col(line: usize, col: usize, known: &Position<'a>) -> Position<'a> {
        let lines = known.data.lines() + 1;
        let line = correct_line(line, lines);
        let col = correct_col(col);
        let mut pos = *known;

        match nearest_pos(line, 1, known.line, lines) {
            NearestPos::BufferEnd => {
                pos.to_buffer_end();
                pos.reverse_to_line_col(line, col);
            }
            NearestPos::KnownPos => {
                if line < known.line {
                    pos.reverse_to_line_col(line, col);
                } else if line > known.line {
                    pos.advance_to_line_col(line, col);
                } else if col > known.col {
                    pos.advance_to_col(col);
                } else if col < known.col {
                    pos.reverse_to_col(col);
                }
            }
            NearestPos::BufferStart => {
                pos.to_buffer_start();
                pos.advance_to_line_col(line, col);
            }
        }

        pos
    }
}

fn nearest_pos(pos: usize, start: usize, known: usize, end: usize) -> NearestPos {
    let start_diff = pos.abs_diff(start);
    let known_diff = pos.abs_diff(known);
    let end_diff = pos.abs_diff(end);

    if known_diff < start_diff && known_diff <= end_diff {
        NearestPos::KnownPos
    } else if end_diff < start_diff {
        NearestPos::BufferEnd
    } else {
        NearestPos::BufferStart
    }
}

/// Policy flags a mark reports to whoever re-anchors it after an edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkProperties {
    /// Update only the mark's offset on edits, never its line or column
    pub adjust_offset_only: bool,
    /// Leave the mark fixed when an edit happens exactly at its offset
    pub no_adjust_on_point: bool,
}

/// A remembered buffer offset with adjustment policy. Marks do not own
/// positions; callers re-anchor them after edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub offset: usize,
    pub properties: MarkProperties,
}

impl Mark {
    /// Record the offset of `pos` with the given adjustment policy
    #[must_use]
    pub fn new(pos: &Position<'_>, properties: MarkProperties) -> Self {
        Self {
            offset: pos.offset,
            properties,
        }
    }
}
