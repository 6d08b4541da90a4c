//! Replacement of search matches, with escape sequences and
//! capture-group backreferences

use crate::buffer::GapBuffer;
use crate::constants::search::{MAX_BACK_REF_OCCURRENCES, MAX_CAPTURE_GROUP_NUM};
use crate::error::{Error, Result};
use crate::search::BufferSearch;

/// One backreference occurrence in compiled replacement text
#[derive(Debug, Clone, Copy)]
pub(crate) struct BackReference {
    /// Capture group the reference names
    group: usize,
    /// Position in the compiled literal text where the group's bytes are
    /// spliced in
    index: usize,
}

/// Replacement text compiled by [`BufferSearch::replace_init`]: the
/// literal bytes with escape sequences expanded, plus the recorded
/// backreference insertion points
#[derive(Debug, Clone)]
pub(crate) struct ReplaceTemplate {
    text: Vec<u8>,
    back_refs: Vec<BackReference>,
}

impl BufferSearch {
    /// Compile `replacement` for use by
    /// [`replace_current_match`](Self::replace_current_match).
    ///
    /// Recognized sequences: `\t`, `\n` (expanding to `\r\n` when
    /// `win_line_endings` is set), `\\`, `\xHH`, and, for regex searches,
    /// the backreferences `\N` and `\{N}`. Fails when a backreference
    /// names a group above [`MAX_CAPTURE_GROUP_NUM`] or when more than
    /// [`MAX_BACK_REF_OCCURRENCES`] backreferences occur.
    pub fn replace_init(&mut self, replacement: &[u8], win_line_endings: bool) -> Result<()> {
        let regex_mode = self.regex().is_some();

        let mut text = Vec::new();
        let mut back_refs = Vec::new();
        let mut k = 0;

        while k < replacement.len() {
            if replacement[k] == b'\\' {
                if let Some(token_len) =
                    push_escape(&mut text, &replacement[k..], win_line_endings)
                {
                    k += token_len;
                    continue;
                }

                if regex_mode {
                    if let Some((group, token_len)) = parse_backreference(&replacement[k..]) {
                        if group > MAX_CAPTURE_GROUP_NUM {
                            return Err(Error::TooManyCaptureGroups { group });
                        }

                        if back_refs.len() >= MAX_BACK_REF_OCCURRENCES {
                            return Err(Error::TooManyBackReferences);
                        }

                        back_refs.push(BackReference {
                            group,
                            index: text.len(),
                        });

                        k += token_len;
                        continue;
                    }
                }
            }

            text.push(replacement[k]);
            k += 1;
        }

        self.replace_template = Some(ReplaceTemplate { text, back_refs });

        Ok(())
    }

    /// Splice the compiled replacement over the most recent match.
    ///
    /// Without backreferences the compiled text replaces the matched
    /// bytes directly. With backreferences the expanded text is staged
    /// first: literal spans interleaved with the captured groups of the
    /// most recent regex match, read out of the buffer itself. Returns
    /// the number of bytes written; with no match recorded this is a
    /// no-op returning `0`. The caller decides where the point lands
    /// afterwards.
    ///
    /// # Panics
    ///
    /// Panics if [`replace_init`](Self::replace_init) has not been
    /// called.
    pub fn replace_current_match(&mut self, buffer: &mut GapBuffer) -> Result<usize> {
        let template = self
            .replace_template
            .as_ref()
            .expect("replace_init must be called before replacing");

        let Some(last_match) = self.last_match() else {
            return Ok(0);
        };

        let match_length = last_match.len();

        if template.back_refs.is_empty() {
            buffer.set_point(last_match.start);
            buffer.replace(match_length, &template.text)?;
            return Ok(template.text.len());
        }

        let regex_search = self
            .regex()
            .expect("backreferences are only compiled for regex searches");

        // Work out the expanded length before staging anything
        let mut new_length = template.text.len();

        for back_ref in &template.back_refs {
            if back_ref.group >= regex_search.group_count() {
                return Err(Error::InvalidCaptureGroupBackReference {
                    group: back_ref.group,
                    captured: regex_search.group_count() - 1,
                });
            }

            if let Some((start, end)) = regex_search.capture(back_ref.group) {
                new_length += end - start;
            }
        }

        let mut new_text = Vec::new();
        new_text
            .try_reserve_exact(new_length)
            .map_err(|_| Error::OutOfMemory)?;

        // Interleave literal spans with captured group bytes read from
        // the buffer. Groups that did not participate in the match
        // contribute nothing.
        let mut text_index = 0;

        for back_ref in &template.back_refs {
            new_text.extend_from_slice(&template.text[text_index..back_ref.index]);
            text_index = back_ref.index;

            if let Some((start, end)) = regex_search.capture(back_ref.group) {
                if end > start {
                    let staged = new_text.len();
                    new_text.resize(staged + (end - start), 0);
                    buffer.get_range(start, &mut new_text[staged..]);
                }
            }
        }

        new_text.extend_from_slice(&template.text[text_index..]);

        buffer.set_point(last_match.start);
        buffer.replace(match_length, &new_text)?;

        Ok(new_text.len())
    }
}

/// Expand the escape sequences `\t`, `\n`, `\\` and `\xHH` in text
/// entered for search or replacement. Unrecognized sequences are kept
/// verbatim. `\n` becomes `\r\n` when `win_line_endings` is set.
#[must_use]
pub fn process_escapes(text: &[u8], win_line_endings: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut k = 0;

    while k < text.len() {
        if text[k] == b'\\' {
            if let Some(token_len) = push_escape(&mut out, &text[k..], win_line_endings) {
                k += token_len;
                continue;
            }
        }

        out.push(text[k]);
        k += 1;
    }

    out
}

/// Expand one escape sequence at the start of `s` into `out`, returning
/// the number of input bytes consumed
fn push_escape(out: &mut Vec<u8>, s: &[u8], win_line_endings: bool) -> Option<usize> {
    debug_assert!(s[0] == b'\\');

    if s.len() < 2 {
        return None;
    }

    match s[1] {
        b't' => {
            out.push(b'\t');
            Some(2)
        }
        b'n' => {
            if win_line_endings {
                out.push(b'\r');
            }
            out.push(b'\n');
            Some(2)
        }
        b'\\' => {
            out.push(b'\\');
            Some(2)
        }
        b'x' if s.len() > 3 && s[2].is_ascii_hexdigit() && s[3].is_ascii_hexdigit() => {
            out.push((hex_value(s[2]) << 4) | hex_value(s[3]));
            Some(4)
        }
        _ => None,
    }
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c.to_ascii_uppercase() - b'A' + 10,
    }
}

/// Parse a `\N` or `\{N}` backreference at the start of `s`, returning
/// the group number and token length
pub(crate) fn parse_backreference(s: &[u8]) -> Option<(usize, usize)> {
    if s.len() < 2 || s[0] != b'\\' {
        return None;
    }

    let mut index = 1;
    let bracketed = s[1] == b'{';

    if bracketed {
        if s.len() < 4 {
            return None;
        }
        index += 1;
    }

    let mut group = 0usize;

    while index < s.len() && s[index].is_ascii_digit() {
        group = group
            .saturating_mul(10)
            .saturating_add(usize::from(s[index] - b'0'));
        index += 1;
    }

    if bracketed {
        if index >= s.len() || s[index] != b'}' || index <= 2 {
            return None;
        }
        index += 1;
    } else if index < 2 {
        return None;
    }

    Some((group, index))
}
