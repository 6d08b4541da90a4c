//! Buffer search: literal and regex, forward and backward, with
//! wrap-around and bounded find-all
//!
//! [`BufferSearch`] abstracts over the two engines. Literal patterns run
//! through a gap-aware Boyer-Moore-Horspool scan; regex patterns run
//! through a compiled engine over flattened storage. Both support
//! wrap-around: an anchored search (one with a fixed starting position,
//! as used by find-and-replace) latches `wrapped` and finishes once the
//! whole buffer has been covered, while a live search wraps freely on
//! every call.
//!
//! Matches are reported as byte offsets. Callers lift them back to
//! line/column positions with `Position::from_offset` after the search,
//! since searches may move the gap.

use crate::buffer::GapBuffer;
use crate::character;
use crate::constants::search::MAX_SEARCH_MATCH_NUM;
use crate::error::Result;
use crate::position::FileFormat;
use log::debug;

pub mod literal_search;
pub mod regex_search;
pub mod replace;

pub use literal_search::TextSearch;
pub use regex_search::RegexSearch;

/// Options common to literal and regex searches
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Literal bytes or regex source to search for
    pub pattern: Vec<u8>,
    /// Fold ASCII case when matching
    pub case_insensitive: bool,
    /// Search direction: `true` forwards, `false` backwards
    pub forward: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            pattern: Vec::new(),
            case_insensitive: true,
            forward: true,
        }
    }
}

/// Which engine a [`BufferSearch`] drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Byte-literal search
    Text,
    /// Regular expression search
    Regex,
}

/// A half-open `[start, end)` byte range in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Match ranges collected by [`BufferSearch::find_all`], with a cursor
/// tracking the current match
#[derive(Debug, Clone, Default)]
pub struct SearchMatches {
    match_ranges: Vec<Range>,
    current_match_index: usize,
}

impl SearchMatches {
    #[must_use]
    pub fn len(&self) -> usize {
        self.match_ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.match_ranges.is_empty()
    }

    /// Index of the current match
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_match_index
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Range> {
        self.match_ranges.get(index).copied()
    }

    /// The collected ranges in buffer order
    pub fn ranges(&self) -> impl Iterator<Item = Range> + '_ {
        self.match_ranges.iter().copied()
    }

    fn clear(&mut self) {
        self.match_ranges.clear();
        self.current_match_index = 0;
    }
}

/// Per-call search state threaded through the engines
#[derive(Debug, Clone, Copy)]
pub struct SearchData {
    /// Offset the current scan starts from
    pub current: usize,
    /// Fixed starting position of an anchored search
    pub anchor: Option<usize>,
    /// Set when the scan crosses a buffer boundary
    pub wrapped: bool,
}

enum SearchEngine {
    Text(TextSearch),
    Regex(RegexSearch),
}

/// A search session over one buffer.
///
/// Owns the options, the engine, the last match, and the wrap/finish
/// state. Anchored searches (constructed with `start_offset`) cover the
/// buffer exactly once; live searches wrap around indefinitely.
pub struct BufferSearch {
    opt: SearchOptions,
    engine: SearchEngine,
    format: FileFormat,
    start_offset: Option<usize>,
    last_match: Option<Range>,
    advance_from_last_match: bool,
    wrapped: bool,
    finished: bool,
    matches: SearchMatches,
    pub(crate) replace_template: Option<replace::ReplaceTemplate>,
}

impl BufferSearch {
    /// Compile a search session.
    ///
    /// `start_offset` anchors the search for bounded operations like
    /// find-and-replace; `None` means a live interactive search.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is empty.
    pub fn new(
        kind: SearchKind,
        opt: SearchOptions,
        format: FileFormat,
        start_offset: Option<usize>,
    ) -> Result<Self> {
        assert!(!opt.pattern.is_empty(), "search pattern must be non-empty");

        let engine = match kind {
            SearchKind::Text => SearchEngine::Text(TextSearch::new(&opt)?),
            SearchKind::Regex => SearchEngine::Regex(RegexSearch::new(&opt)?),
        };

        Ok(Self {
            opt,
            engine,
            format,
            start_offset,
            last_match: None,
            advance_from_last_match: true,
            wrapped: false,
            finished: false,
            matches: SearchMatches::default(),
            replace_template: None,
        })
    }

    /// Restart the session with a new anchor, clearing match state
    pub fn reset(&mut self, start_offset: Option<usize>) {
        self.start_offset = start_offset;
        self.last_match = None;
        self.advance_from_last_match = true;
        self.wrapped = false;
        self.finished = false;
        self.matches.clear();
    }

    /// The options this search was compiled with
    #[must_use]
    pub fn options(&self) -> &SearchOptions {
        &self.opt
    }

    /// Which engine this search drives
    #[must_use]
    pub fn kind(&self) -> SearchKind {
        match self.engine {
            SearchEngine::Text(_) => SearchKind::Text,
            SearchEngine::Regex(_) => SearchKind::Regex,
        }
    }

    /// Whether the last completed call crossed a buffer boundary
    #[must_use]
    pub fn wrapped(&self) -> bool {
        self.wrapped
    }

    /// Whether an anchored search has covered the entire buffer
    #[must_use]
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// The most recent match
    #[must_use]
    pub fn last_match(&self) -> Option<Range> {
        self.last_match
    }

    /// Length in bytes of the most recent match, `0` if none
    #[must_use]
    pub fn match_length(&self) -> usize {
        self.last_match.map_or(0, |range| range.len())
    }

    /// Ranges collected by [`find_all`](Self::find_all)
    #[must_use]
    pub fn matches(&self) -> &SearchMatches {
        &self.matches
    }

    pub(crate) fn regex(&self) -> Option<&RegexSearch> {
        match &self.engine {
            SearchEngine::Regex(regex_search) => Some(regex_search),
            SearchEngine::Text(_) => None,
        }
    }

    /// Find the next match in the configured direction, starting from
    /// `current_offset`. Returns the match start offset.
    ///
    /// A forward search that starts exactly on its own previous match
    /// advances one character first, so repeated calls step through the
    /// buffer. Once an anchored search is finished, calls cycle through
    /// the ranges collected by [`find_all`](Self::find_all) instead.
    pub fn find_next(
        &mut self,
        buffer: &mut GapBuffer,
        current_offset: usize,
    ) -> Result<Option<usize>> {
        if self.finished {
            return Ok(self.cycle_matches());
        }

        let mut current = current_offset;

        if self.advance_from_last_match && self.opt.forward {
            if let Some(last) = self.last_match {
                if current == last.start {
                    current = next_char_offset(buffer, current, self.format);
                }
            }
        }

        let mut data = SearchData {
            current,
            anchor: self.start_offset,
            // A live search reports wrap-around per call; an anchored one
            // latches it until reset
            wrapped: if self.start_offset.is_some() {
                self.wrapped
            } else {
                false
            },
        };

        let result = match &mut self.engine {
            SearchEngine::Text(text_search) => {
                if self.opt.forward {
                    text_search.find_next(buffer, &mut data)
                } else {
                    text_search.find_prev(buffer, &mut data)
                }
            }
            SearchEngine::Regex(regex_search) => {
                if self.opt.forward {
                    regex_search.find_next(buffer, &mut data)
                } else {
                    regex_search.find_prev(buffer, &mut data)
                }
            }
        };

        if data.wrapped && !self.wrapped {
            debug!("search wrapped around buffer boundary");
        }
        self.wrapped = data.wrapped;

        match result {
            Some(match_point) => {
                let match_length = match &self.engine {
                    SearchEngine::Text(_) => self.opt.pattern.len(),
                    SearchEngine::Regex(regex_search) => regex_search.match_length(),
                };
                self.last_match = Some(Range {
                    start: match_point,
                    end: match_point + match_length,
                });
                Ok(Some(match_point))
            }
            None => {
                if self.start_offset.is_some() {
                    self.finished = true;
                }
                Ok(None)
            }
        }
    }

    fn cycle_matches(&mut self) -> Option<usize> {
        if self.matches.match_ranges.is_empty() {
            return None;
        }

        let match_num = self.matches.match_ranges.len();
        let index = self.matches.current_match_index;

        self.matches.current_match_index = if self.opt.forward {
            (index + 1) % match_num
        } else if index == 0 {
            match_num - 1
        } else {
            index - 1
        };

        self.set_match_index(self.matches.current_match_index);
        self.last_match.map(|range| range.start)
    }

    fn set_match_index(&mut self, index: usize) {
        if index >= self.matches.match_ranges.len() {
            return;
        }

        self.matches.current_match_index = index;
        self.last_match = Some(self.matches.match_ranges[index]);
    }

    /// Collect every match in the buffer, up to
    /// [`MAX_SEARCH_MATCH_NUM`], and place the match cursor relative to
    /// `current_offset` so that the next [`find_next`](Self::find_next)
    /// lands on the match a caller at that offset would expect.
    ///
    /// If the cap is hit the collection is kept but the search reverts to
    /// incremental mode.
    pub fn find_all(&mut self, buffer: &mut GapBuffer, current_offset: usize) -> Result<()> {
        let orig_forward = self.opt.forward;

        self.reset(Some(0));
        self.opt.forward = true;

        let mut pos = 0;

        loop {
            if let Some(match_point) = self.find_next(buffer, pos)? {
                let range = Range {
                    start: match_point,
                    end: match_point + self.match_length(),
                };

                // A zero-width match at the buffer end cannot be advanced
                // past and would repeat forever
                if self.matches.match_ranges.last() == Some(&range) {
                    break;
                }

                self.matches.match_ranges.push(range);

                if self.matches.match_ranges.len() == MAX_SEARCH_MATCH_NUM {
                    break;
                }

                pos = match_point;
            }

            if self.finished {
                break;
            }
        }

        self.opt.forward = orig_forward;

        if self.matches.match_ranges.len() == MAX_SEARCH_MATCH_NUM {
            // The collection is partial: fall back to incremental search
            self.finished = false;
            self.start_offset = None;
            self.wrapped = false;
        }

        if self.matches.match_ranges.is_empty() {
            return Ok(());
        }

        let match_num = self.matches.match_ranges.len();
        let index = match self
            .matches
            .match_ranges
            .binary_search_by(|range| range.start.cmp(&current_offset))
        {
            // Step so the next find_next cycles onto the right range
            Ok(exact) => {
                if orig_forward {
                    (exact + match_num - 1) % match_num
                } else {
                    (exact + 1) % match_num
                }
            }
            Err(insertion) => {
                if orig_forward {
                    (insertion + match_num - 1) % match_num
                } else {
                    insertion % match_num
                }
            }
        };

        self.set_match_index(index);

        Ok(())
    }
}

/// Offset one full character forward, consuming a `\r\n` pair as one
/// terminator under Windows format
fn next_char_offset(buffer: &GapBuffer, offset: usize, format: FileFormat) -> usize {
    let buffer_len = buffer.len();

    if offset >= buffer_len {
        return buffer_len;
    }

    if format == FileFormat::Windows
        && buffer.byte_at(offset) == b'\r'
        && offset + 1 < buffer_len
        && buffer.byte_at(offset + 1) == b'\n'
    {
        return offset + 2;
    }

    (offset + character::char_byte_length(buffer, offset)).min(buffer_len)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
