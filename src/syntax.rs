//! Token spans produced by an external syntax tokenizer
//!
//! The core does not tokenize anything itself. A tokenizer consumes the
//! flattened buffer text and reports token spans here; the collection
//! caps its size and coalesces adjacent spans of the same token so the
//! renderer sees one span per run.

use crate::constants::syntax::MAX_SYNTAX_MATCH_NUM;

/// Token classes a tokenizer can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxToken {
    Normal,
    Comment,
    Constant,
    Identifier,
    Statement,
    Type,
    Special,
    Todo,
}

/// One tokenized span of buffer text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxMatch {
    /// Byte offset of the span
    pub offset: usize,
    /// Length of the span in bytes
    pub length: usize,
    /// Token class of the span
    pub token: SyntaxToken,
}

/// Bounded collection of token spans in buffer order
#[derive(Debug, Clone, Default)]
pub struct SyntaxMatches {
    matches: Vec<SyntaxMatch>,
}

impl SyntaxMatches {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spans held
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<SyntaxMatch> {
        self.matches.get(index).copied()
    }

    /// The spans in buffer order
    pub fn iter(&self) -> impl Iterator<Item = SyntaxMatch> + '_ {
        self.matches.iter().copied()
    }

    /// Record a span. A span contiguous with the previous one and of the
    /// same token extends it instead of adding a new entry. Beyond
    /// [`MAX_SYNTAX_MATCH_NUM`] spans, further ones are dropped.
    pub fn add_match(&mut self, offset: usize, length: usize, token: SyntaxToken) {
        if let Some(prev) = self.matches.last_mut() {
            if prev.token == token && prev.offset + prev.length == offset {
                prev.length += length;
                return;
            }
        }

        if self.matches.len() < MAX_SYNTAX_MATCH_NUM {
            self.matches.push(SyntaxMatch {
                offset,
                length,
                token,
            });
        }
    }

    /// Offset one past the end of the last recorded span, `0` when empty
    #[must_use]
    pub fn last_tokenized_offset(&self) -> usize {
        self.matches
            .last()
            .map_or(0, |m| m.offset + m.length)
    }
}

#[cfg(test)]
#[path = "syntax_tests.rs"]
mod tests;
