//! Regex search over flattened buffer storage

use crate::buffer::GapBuffer;
use crate::constants::search::REGEX_BUFFER_SIZE;
use crate::error::{Error, Result};
use crate::search::{SearchData, SearchOptions};
use log::trace;
use regex::bytes::{CaptureLocations, Regex, RegexBuilder};

/// A compiled regex search.
///
/// Patterns are compiled multiline, so `^` and `$` match at line
/// boundaries, and run over raw bytes: the buffer may contain invalid
/// UTF-8 and the engine simply will not match Unicode classes across
/// damaged bytes. The engine needs contiguous text, so every scan
/// flattens the gap buffer first.
///
/// After a successful scan the capture vector for the most recent match
/// is retained and feeds the backreference replacement path.
pub struct RegexSearch {
    regex: Regex,
    capture_locations: CaptureLocations,
    match_length: usize,
}

impl RegexSearch {
    /// Compile the pattern from `opt`.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is empty.
    pub fn new(opt: &SearchOptions) -> Result<Self> {
        assert!(!opt.pattern.is_empty(), "search pattern must be non-empty");

        let pattern = std::str::from_utf8(&opt.pattern).map_err(|_| Error::InvalidRegex {
            message: "pattern is not valid UTF-8".to_owned(),
        })?;

        let regex = RegexBuilder::new(pattern)
            .multi_line(true)
            .unicode(true)
            .case_insensitive(opt.case_insensitive)
            .build()
            .map_err(|e| Error::InvalidRegex {
                message: e.to_string(),
            })?;

        trace!("compiled regex pattern ({} capture groups)", regex.captures_len());

        let capture_locations = regex.capture_locations();

        Ok(Self {
            regex,
            capture_locations,
            match_length: 0,
        })
    }

    /// Length in bytes of the most recent match
    #[must_use]
    pub fn match_length(&self) -> usize {
        self.match_length
    }

    /// Number of capture groups the pattern defines, including group 0
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.capture_locations.len()
    }

    /// Byte range captured by group `group` in the most recent match.
    /// `None` when the group did not participate in the match.
    #[must_use]
    pub fn capture(&self, group: usize) -> Option<(usize, usize)> {
        self.capture_locations.get(group)
    }

    /// Run the engine over `text[..limit]` starting at `point`,
    /// recording match and capture data. PCRE-style calling convention:
    /// `point` is the start offset, `limit` truncates the subject.
    fn exec(&mut self, text: &[u8], point: usize, limit: usize) -> Option<usize> {
        let limit = limit.min(text.len());

        if point > limit {
            return None;
        }

        let m = self
            .regex
            .captures_read_at(&mut self.capture_locations, &text[..limit], point)?;

        self.match_length = m.end() - m.start();
        Some(m.start())
    }

    /// Forward search with wrap-around over flattened storage
    pub fn find_next(&mut self, buffer: &mut GapBuffer, data: &mut SearchData) -> Option<usize> {
        let buffer_len = buffer.len();
        buffer.contiguous_storage();
        let text = buffer.text();

        let limit = if data.wrapped {
            // Slack past the anchor lets a match straddling it complete
            (data.anchor.unwrap_or(buffer_len) + REGEX_BUFFER_SIZE).min(buffer_len)
        } else {
            buffer_len
        };

        if !data.wrapped {
            if let Some(match_point) = self.exec(text, data.current, limit) {
                return Some(match_point);
            }

            data.wrapped = true;
        } else if let Some(match_point) = self.exec(text, data.current, limit) {
            // An anchored search must not report matches it already
            // covered before wrapping
            return match data.anchor {
                Some(anchor) if match_point >= anchor => None,
                _ => Some(match_point),
            };
        } else {
            return None;
        }

        let base = data.anchor.unwrap_or(data.current);
        let limit = (base + REGEX_BUFFER_SIZE).min(buffer_len);

        match self.exec(text, 0, limit) {
            Some(match_point) => match data.anchor {
                Some(anchor) if match_point >= anchor => None,
                _ => Some(match_point),
            },
            None => None,
        }
    }

    /// Backward search with wrap-around over flattened storage
    pub fn find_prev(&mut self, buffer: &mut GapBuffer, data: &mut SearchData) -> Option<usize> {
        let buffer_len = buffer.len();
        buffer.contiguous_storage();

        let limit = match (data.wrapped, data.anchor) {
            (true, Some(anchor)) => anchor,
            _ => 0,
        };

        if let Some(match_point) = self.find_prev_str(buffer, data.current, limit, data.current) {
            return Some(match_point);
        }

        if data.wrapped {
            return None;
        }

        data.wrapped = true;

        let limit = data.anchor.unwrap_or(data.current);
        self.find_prev_str(buffer, buffer_len, limit, buffer_len)
    }

    /// Reverse scan: step back through the text in
    /// [`REGEX_BUFFER_SIZE`] chunks, exec forward repeatedly within each
    /// chunk keeping the last match that starts before `start_point`, and
    /// stop at the first chunk that yields one.
    fn find_prev_str(
        &mut self,
        buffer: &GapBuffer,
        mut point: usize,
        limit: usize,
        start_point: usize,
    ) -> Option<usize> {
        let text = buffer.text();
        let text_len = text.len();
        let mut found: Option<(usize, usize)> = None;

        while point > limit {
            let step = (point - limit).min(REGEX_BUFFER_SIZE);
            point -= step;

            // Extend the chunk so matches spanning its end can complete
            let search_length = (step + REGEX_BUFFER_SIZE).min(text_len - point);
            let mut search_point = point;

            while search_point < start_point {
                match self.exec(text, search_point, point + search_length) {
                    Some(match_point) if match_point < start_point => {
                        found = Some((match_point, self.match_length));
                        search_point = match_point + self.match_length.max(1);
                    }
                    _ => break,
                }
            }

            if let Some((match_point, match_length)) = found {
                // Later execs in the chunk may have overwritten the
                // capture data for the match being returned; re-run the
                // engine against exactly that span to repopulate it
                if self.capture(0).map(|(start, _)| start) != Some(match_point) {
                    self.exec(text, match_point, match_point + match_length);
                }

                return Some(match_point);
            }
        }

        None
    }
}
