//! Tests for syntax match collection

use super::*;

#[test]
fn test_add_match() {
    let mut matches = SyntaxMatches::new();
    matches.add_match(0, 4, SyntaxToken::Statement);
    matches.add_match(5, 3, SyntaxToken::Identifier);

    assert_eq!(matches.len(), 2);
    assert_eq!(
        matches.get(0),
        Some(SyntaxMatch {
            offset: 0,
            length: 4,
            token: SyntaxToken::Statement
        })
    );
    assert_eq!(matches.last_tokenized_offset(), 8);
}

#[test]
fn test_contiguous_same_token_coalesces() {
    let mut matches = SyntaxMatches::new();
    matches.add_match(0, 4, SyntaxToken::Comment);
    matches.add_match(4, 6, SyntaxToken::Comment);
    matches.add_match(10, 2, SyntaxToken::Comment);

    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches.get(0),
        Some(SyntaxMatch {
            offset: 0,
            length: 12,
            token: SyntaxToken::Comment
        })
    );
}

#[test]
fn test_gap_or_token_change_starts_new_span() {
    let mut matches = SyntaxMatches::new();
    matches.add_match(0, 4, SyntaxToken::Comment);
    // Same token but not contiguous
    matches.add_match(6, 2, SyntaxToken::Comment);
    // Contiguous but different token
    matches.add_match(8, 3, SyntaxToken::Todo);

    assert_eq!(matches.len(), 3);
}

#[test]
fn test_match_cap() {
    let mut matches = SyntaxMatches::new();

    for k in 0..crate::constants::syntax::MAX_SYNTAX_MATCH_NUM + 100 {
        // Alternate tokens so nothing coalesces
        let token = if k % 2 == 0 {
            SyntaxToken::Normal
        } else {
            SyntaxToken::Type
        };
        matches.add_match(k * 2, 1, token);
    }

    assert_eq!(matches.len(), crate::constants::syntax::MAX_SYNTAX_MATCH_NUM);
}

#[test]
fn test_iter_in_order() {
    let mut matches = SyntaxMatches::new();
    matches.add_match(0, 1, SyntaxToken::Normal);
    matches.add_match(2, 1, SyntaxToken::Constant);
    matches.add_match(4, 1, SyntaxToken::Special);

    let offsets: Vec<usize> = matches.iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![0, 2, 4]);
}
