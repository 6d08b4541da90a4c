//! Global constants for the text buffer core

pub mod buffer {
    /// Amount the gap grows by when it runs out of space, and the slack
    /// retained when storage shrinks after a large delete
    pub const GAP_INCREMENT: usize = 1024;

    /// Maximum number of stored bytes a single segment may hold
    pub const MAX_SEGMENT_SIZE: usize = 1024 * 1024;

    /// Allocation size for segments created during a bulk insert
    pub const NEW_SEGMENT_SIZE: usize = MAX_SEGMENT_SIZE - GAP_INCREMENT;
}

pub mod search {
    /// Number of distinct byte values, i.e. the size of the bad character
    /// shift table used by literal search
    pub const ALPHABET_SIZE: usize = 256;

    /// Window size used when running a reverse literal search as a series
    /// of forward scans
    pub const SEARCH_BUFFER_SIZE: usize = 8192;

    /// Chunk size for reverse regex scans. Also the slack added to the
    /// wrap-around limit so patterns straddling the limit can still match
    pub const REGEX_BUFFER_SIZE: usize = 8192;

    /// Size of the capture offset vector, PCRE-style: one third workspace,
    /// the rest holding (start, end) pairs
    pub const OUTPUT_VECTOR_SIZE: usize = 90;

    /// Highest capture group number usable in replacement backreferences
    pub const MAX_CAPTURE_GROUP_NUM: usize =
        ((OUTPUT_VECTOR_SIZE - (OUTPUT_VECTOR_SIZE / 3)) / 2) - 1;

    /// Maximum number of backreference occurrences in replacement text
    pub const MAX_BACK_REF_OCCURRENCES: usize = 100;

    /// Maximum number of ranges collected by a find-all pass
    pub const MAX_SEARCH_MATCH_NUM: usize = 1000;
}

pub mod syntax {
    /// Maximum number of token spans retained from a tokenizer run
    pub const MAX_SYNTAX_MATCH_NUM: usize = 4096;
}

pub mod config {
    /// Tab stop width used when no configuration is supplied
    pub const DEFAULT_TAB_WIDTH: usize = 8;
}
