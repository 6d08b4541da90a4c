//! Tests for literal and regex search

use super::*;
use crate::buffer::GapBuffer;

fn buffer_with(bytes: &[u8]) -> GapBuffer {
    let mut buf = GapBuffer::new(16).unwrap();
    buf.add(bytes).unwrap();
    buf
}

fn text_search(pattern: &[u8], case_insensitive: bool, forward: bool) -> BufferSearch {
    BufferSearch::new(
        SearchKind::Text,
        SearchOptions {
            pattern: pattern.to_vec(),
            case_insensitive,
            forward,
        },
        FileFormat::Unix,
        None,
    )
    .unwrap()
}

fn regex_search(pattern: &[u8], forward: bool) -> BufferSearch {
    BufferSearch::new(
        SearchKind::Regex,
        SearchOptions {
            pattern: pattern.to_vec(),
            case_insensitive: false,
            forward,
        },
        FileFormat::Unix,
        None,
    )
    .unwrap()
}

// --- Literal search ---

#[test]
fn test_literal_forward() {
    let mut buf = buffer_with(b"one two three two");
    let mut search = text_search(b"two", false, true);

    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(4));
    assert_eq!(search.match_length(), 3);
    assert_eq!(search.last_match(), Some(Range { start: 4, end: 7 }));
}

#[test]
fn test_literal_case_insensitive_sequence() {
    // Scenario: case-insensitive "LO" over "Hello Hello"
    let mut buf = buffer_with(b"Hello Hello");
    let mut search = text_search(b"LO", true, true);

    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(3));
    assert!(!search.wrapped());

    // Restarting from the previous match advances a character first
    assert_eq!(search.find_next(&mut buf, 3).unwrap(), Some(9));

    // From past the last match the search wraps to the first
    assert_eq!(search.find_next(&mut buf, 10).unwrap(), Some(3));
    assert!(search.wrapped());
}

#[test]
fn test_literal_from_mid_match() {
    let mut buf = buffer_with(b"Hello Hello");
    let mut search = text_search(b"LO", true, true);

    assert_eq!(search.find_next(&mut buf, 5).unwrap(), Some(9));
}

#[test]
fn test_literal_case_sensitive() {
    let mut buf = buffer_with(b"Hello hello");
    let mut search = text_search(b"hello", false, true);

    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(6));

    let mut search = text_search(b"Hexlo", false, true);
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), None);
}

#[test]
fn test_literal_backward() {
    let mut buf = buffer_with(b"Hello Hello");
    let mut search = text_search(b"lo", true, false);

    let buf_len = buf.len();
    assert_eq!(search.find_next(&mut buf, buf_len).unwrap(), Some(9));
    assert_eq!(search.find_next(&mut buf, 9).unwrap(), Some(3));

    // Nothing before the first match, so the search wraps to the last
    assert_eq!(search.find_next(&mut buf, 3).unwrap(), Some(9));
    assert!(search.wrapped());
}

#[test]
fn test_literal_across_gap() {
    let mut buf = buffer_with(b"abcdef");
    buf.set_point(3);
    buf.insert(b"XY").unwrap();
    // Contents are now "abcXYdef" with the gap after the insertion

    let mut search = text_search(b"cXYd", false, true);
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(2));

    let mut search = text_search(b"Ydef", false, true);
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(4));

    let mut search = text_search(b"YX", false, true);
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), None);
}

#[test]
fn test_literal_straddle_after_shifted_alignment() {
    // A mismatch alignment right before the gap must not hide a match
    // that straddles it
    let mut buf = buffer_with(b"aab");
    buf.set_point(1);
    buf.insert(b"a").unwrap();
    // Contents "aaab", gap after offset 2

    let mut search = text_search(b"aab", false, true);
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(1));
}

#[test]
fn test_literal_anchored_finishes() {
    let mut buf = buffer_with(b"x one x one x");
    let mut search = BufferSearch::new(
        SearchKind::Text,
        SearchOptions {
            pattern: b"one".to_vec(),
            case_insensitive: false,
            forward: true,
        },
        FileFormat::Unix,
        Some(2),
    )
    .unwrap();

    assert_eq!(search.find_next(&mut buf, 2).unwrap(), Some(2));
    assert_eq!(search.find_next(&mut buf, 2).unwrap(), Some(8));
    // Wraps and finds nothing new before the anchor
    assert_eq!(search.find_next(&mut buf, 10).unwrap(), None);
    assert!(search.finished());
}

#[test]
fn test_literal_pattern_longer_than_buffer() {
    let mut buf = buffer_with(b"ab");
    let mut search = text_search(b"abcdef", false, true);
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), None);
}

#[test]
fn test_literal_reverse_window_boundary() {
    // Place matches so the reverse window scan has to extend past a
    // window edge: text longer than SEARCH_BUFFER_SIZE with the only
    // match straddling the first window boundary
    let size = crate::constants::search::SEARCH_BUFFER_SIZE;
    let mut text = vec![b'.'; size + 64];
    // Two bytes below the second window's edge, so the match straddles it
    let at = 62;
    text[at..at + 4].copy_from_slice(b"ping");

    let mut buf = buffer_with(&text);
    let mut search = text_search(b"ping", false, false);

    assert_eq!(search.find_next(&mut buf, text.len()).unwrap(), Some(at));
}

// --- Regex search ---

#[test]
fn test_regex_forward() {
    let mut buf = buffer_with(b"foo bar baz");
    let mut search = regex_search(br"(\w+) (\w+)", true);

    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(0));
    assert_eq!(search.match_length(), 7);
}

#[test]
fn test_regex_multiline() {
    let mut buf = buffer_with(b"alpha\nbeta");
    let mut search = regex_search(br"^beta$", true);

    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(6));
}

#[test]
fn test_regex_case_insensitive() {
    let mut buf = buffer_with(b"abc ABC");
    let mut search = BufferSearch::new(
        SearchKind::Regex,
        SearchOptions {
            pattern: b"abc".to_vec(),
            case_insensitive: true,
            forward: true,
        },
        FileFormat::Unix,
        None,
    )
    .unwrap();

    assert_eq!(search.find_next(&mut buf, 2).unwrap(), Some(4));
}

#[test]
fn test_regex_wraps() {
    let mut buf = buffer_with(b"abc def");
    let mut search = regex_search(b"abc", true);

    assert_eq!(search.find_next(&mut buf, 4).unwrap(), Some(0));
    assert!(search.wrapped());
}

#[test]
fn test_regex_anchored_covers_buffer_once() {
    let mut buf = buffer_with(b"foo x foo y");
    let mut search = BufferSearch::new(
        SearchKind::Regex,
        SearchOptions {
            pattern: b"foo".to_vec(),
            case_insensitive: false,
            forward: true,
        },
        FileFormat::Unix,
        Some(4),
    )
    .unwrap();

    assert_eq!(search.find_next(&mut buf, 4).unwrap(), Some(6));
    // Wraps back to the match before the anchor
    assert_eq!(search.find_next(&mut buf, 6).unwrap(), Some(0));
    assert!(search.wrapped());
    // Everything is covered now
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), None);
    assert!(search.finished());
}

#[test]
fn test_regex_backward() {
    let mut buf = buffer_with(b"foo bar foo");
    let mut search = regex_search(b"foo", false);

    let buf_len = buf.len();
    assert_eq!(search.find_next(&mut buf, buf_len).unwrap(), Some(8));
    assert_eq!(search.find_next(&mut buf, 8).unwrap(), Some(0));

    // Wraps to the last match
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(8));
    assert!(search.wrapped());
}

#[test]
fn test_regex_backward_repopulates_captures() {
    let mut buf = buffer_with(b"ab-1 cd-2 ef-3");
    let mut search = regex_search(br"(\w+)-(\d)", false);

    // The chunk scan execs past the returned match before stopping; the
    // returned one must carry its own captures, not the last exec's
    assert_eq!(search.find_next(&mut buf, 10).unwrap(), Some(5));

    let regex = search.regex().unwrap();
    assert_eq!(regex.capture(1), Some((5, 7)));
    assert_eq!(regex.capture(2), Some((8, 9)));
}

#[test]
fn test_regex_invalid_pattern() {
    let result = BufferSearch::new(
        SearchKind::Regex,
        SearchOptions {
            pattern: b"(".to_vec(),
            case_insensitive: false,
            forward: true,
        },
        FileFormat::Unix,
        None,
    );

    assert!(matches!(result, Err(crate::error::Error::InvalidRegex { .. })));
}

// --- find_all ---

#[test]
fn test_find_all_collects_and_positions_cursor() {
    let mut buf = buffer_with(b"Hello Hello");
    let mut search = text_search(b"lo", true, true);

    search.find_all(&mut buf, 0).unwrap();

    let ranges: Vec<Range> = search.matches().ranges().collect();
    assert_eq!(
        ranges,
        vec![Range { start: 3, end: 5 }, Range { start: 9, end: 11 }]
    );
    assert!(search.finished());

    // Stepping from offset 0 lands on the first match
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(3));
    assert_eq!(search.find_next(&mut buf, 3).unwrap(), Some(9));
    // And cycles around
    assert_eq!(search.find_next(&mut buf, 9).unwrap(), Some(3));
}

#[test]
fn test_find_all_backward_cursor() {
    let mut buf = buffer_with(b"ab ab ab");
    let mut search = text_search(b"ab", false, false);

    search.find_all(&mut buf, 4).unwrap();
    assert_eq!(search.matches().len(), 3);

    // Stepping backwards from offset 4 lands on the match before it
    assert_eq!(search.find_next(&mut buf, 4).unwrap(), Some(3));
    assert_eq!(search.find_next(&mut buf, 3).unwrap(), Some(0));
    // And wraps to the last match
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), Some(6));
}

#[test]
fn test_find_all_empty_result() {
    let mut buf = buffer_with(b"nothing here");
    let mut search = text_search(b"zzz", false, true);

    search.find_all(&mut buf, 0).unwrap();
    assert!(search.matches().is_empty());
    assert_eq!(search.find_next(&mut buf, 0).unwrap(), None);
}

// --- Options ---

#[test]
fn test_default_options() {
    let opt = SearchOptions::default();
    assert!(opt.case_insensitive);
    assert!(opt.forward);
    assert!(opt.pattern.is_empty());
}

#[test]
fn test_kind_reported() {
    let search = text_search(b"x", false, true);
    assert_eq!(search.kind(), SearchKind::Text);

    let search = regex_search(b"x", true);
    assert_eq!(search.kind(), SearchKind::Regex);
}
