//! Literal search via Boyer-Moore-Horspool, aware of the gap

use crate::buffer::GapBuffer;
use crate::constants::search::{ALPHABET_SIZE, SEARCH_BUFFER_SIZE};
use crate::error::{try_to_vec, Result};
use crate::search::{SearchData, SearchOptions};

/// A compiled literal search: the pattern, a byte case-folding table, and
/// the bad-character shift table.
///
/// Case folding is ASCII only and is baked into both the table and the
/// pattern at construction, so each search is self-contained and
/// re-entrant. Non-ASCII case-insensitive matching is unsupported: bytes
/// above 127 compare literally.
pub struct TextSearch {
    pattern: Vec<u8>,
    fold: [u8; ALPHABET_SIZE],
    bad_char_table: [usize; ALPHABET_SIZE],
}

impl TextSearch {
    /// Compile the pattern from `opt`, folding it to lowercase when the
    /// search is case-insensitive.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is empty.
    pub fn new(opt: &SearchOptions) -> Result<Self> {
        assert!(!opt.pattern.is_empty(), "search pattern must be non-empty");

        let mut fold: [u8; ALPHABET_SIZE] = std::array::from_fn(|k| k as u8);

        if opt.case_insensitive {
            for b in b'A'..=b'Z' {
                fold[b as usize] = b + 32;
            }
        }

        let mut pattern = try_to_vec(&opt.pattern)?;

        if opt.case_insensitive {
            for byte in pattern.iter_mut() {
                *byte = fold[*byte as usize];
            }
        }

        let mut bad_char_table = [pattern.len(); ALPHABET_SIZE];

        // Characters that appear in the pattern shift by their distance
        // from the pattern end
        for (k, &byte) in pattern[..pattern.len() - 1].iter().enumerate() {
            bad_char_table[byte as usize] = pattern.len() - 1 - k;
        }

        Ok(Self {
            pattern,
            fold,
            bad_char_table,
        })
    }

    /// Forward search with wrap-around. The first scan runs from
    /// `data.current` to the buffer end (or, when already wrapped, to the
    /// anchor plus pattern slack); on failure the search wraps to the
    /// buffer start.
    pub fn find_next(&self, buffer: &GapBuffer, data: &mut SearchData) -> Option<usize> {
        let pattern_len = self.pattern.len();

        let limit = match (data.wrapped, data.anchor) {
            // Pattern slack covers a match straddling the anchor
            (true, Some(anchor)) => anchor + pattern_len - 1,
            _ => buffer.len(),
        };

        if let Some(match_point) = self.find_next_str(buffer, data.current, limit) {
            return Some(match_point);
        }

        if data.wrapped {
            // The whole buffer has been covered
            return None;
        }

        data.wrapped = true;

        let limit = data.anchor.unwrap_or(data.current);
        self.find_next_str(buffer, 0, limit + pattern_len - 1)
    }

    /// Backward search with wrap-around, implemented as forward scans
    /// over sliding windows
    pub fn find_prev(&self, buffer: &GapBuffer, data: &mut SearchData) -> Option<usize> {
        let limit = match (data.wrapped, data.anchor) {
            (true, Some(anchor)) => anchor,
            _ => 0,
        };

        if let Some(match_point) = self.find_prev_str(buffer, data.current, limit) {
            return Some(match_point);
        }

        if data.wrapped {
            return None;
        }

        data.wrapped = true;

        let limit = data.anchor.unwrap_or(data.current);
        self.find_prev_str(buffer, buffer.len(), limit)
    }

    /// Scan for the first match at or after `point` whose end does not
    /// exceed `limit`, without moving the gap.
    ///
    /// The text is covered in three regions: the bytes before the gap, a
    /// small copied bridge straddling the gap, and the bytes after it.
    fn find_next_str(&self, buffer: &GapBuffer, point: usize, limit: usize) -> Option<usize> {
        let pattern_len = self.pattern.len();
        let buffer_len = buffer.len();

        if point >= buffer_len
            || limit < point + pattern_len
            || point + pattern_len > buffer_len
        {
            return None;
        }

        let limit_ext = limit.min(buffer_len);
        let point_ext = point;

        let point = buffer.internal_point(point);
        let limit = buffer.internal_point(limit_ext);

        let gap_start = buffer.gap_start();
        let gap_end = buffer.gap_end();
        let raw = buffer.raw();

        if point + pattern_len <= gap_start {
            if let Some(match_point) = self.find_in_range(raw, point, limit.min(gap_start)) {
                // Below the gap internal and external offsets coincide
                return Some(match_point);
            }
        }

        // Matches straddling the gap: join the bytes around it into a
        // small bridge buffer covering every candidate that ends at or
        // past the gap. Its size is bounded by twice the pattern length.
        let bridge_base = point_ext.max(gap_start.saturating_sub(pattern_len - 1));

        if bridge_base < gap_start && bridge_base + pattern_len <= limit_ext {
            let bridge_size = (gap_start - bridge_base + pattern_len)
                .min(buffer_len - bridge_base)
                .min(limit_ext - bridge_base);

            let mut bridge = vec![0u8; bridge_size];
            let copied = buffer.get_range(bridge_base, &mut bridge);

            if copied == bridge_size {
                if let Some(match_point) = self.find_in_range(&bridge, 0, bridge_size) {
                    return Some(match_point + bridge_base);
                }
            }
        }

        let point = point.max(gap_end);

        if point + pattern_len > limit {
            return None;
        }

        self.find_in_range(raw, point, limit.min(raw.len()))
            .map(|match_point| buffer.external_point(match_point))
    }

    /// Reverse search: slide a window back from `point` towards `limit`,
    /// forward-scan each window keeping the last hit, and stop at the
    /// first window that produced one.
    fn find_prev_str(&self, buffer: &GapBuffer, mut point: usize, limit: usize) -> Option<usize> {
        let pattern_len = self.pattern.len();
        let buffer_len = buffer.len();
        let mut found = None;

        while point > limit {
            let step = (point - limit).min(SEARCH_BUFFER_SIZE);
            point -= step;

            // Extend past the window end so matches spanning the window
            // boundary are not lost
            let search_length = (step + pattern_len - 1).min(buffer_len - point);
            let mut search_point = point;

            while let Some(match_point) =
                self.find_next_str(buffer, search_point, point + search_length)
            {
                found = Some(match_point);
                search_point = match_point + 1;
            }

            if found.is_some() {
                return found;
            }
        }

        None
    }

    /// Boyer-Moore-Horspool over a flat byte slice. Matches must end
    /// strictly before `limit`. The haystack is folded through the case
    /// table; the pattern was folded at construction.
    fn find_in_range(&self, text: &[u8], start_point: usize, limit: usize) -> Option<usize> {
        let pattern = &self.pattern;
        let pattern_len = pattern.len();
        let mut point = start_point + pattern_len - 1;

        while point < limit {
            let sub_start_point = point;
            let mut pattern_idx = pattern_len;
            let mut k = point;

            loop {
                if self.fold[text[k] as usize] != pattern[pattern_idx - 1] {
                    point = sub_start_point
                        + self.bad_char_table[self.fold[text[sub_start_point] as usize] as usize];
                    break;
                }

                pattern_idx -= 1;

                if pattern_idx == 0 {
                    return Some(sub_start_point - (pattern_len - 1));
                }

                k -= 1;
            }
        }

        None
    }
}
