//! Textbuf - text storage, navigation and search core for the rift editor
//!
//! The crate is a library with no terminal, file or rendering concerns:
//! it stores a document in gap buffers, addresses it through line- and
//! column-aware positions, and searches it with literal and regex
//! engines including backreference-aware replacement. A small radix tree
//! rounds it out for prefix-indexed command lookup.

pub mod buffer;
pub mod character;
pub mod config;
pub mod constants;
pub mod error;
pub mod position;
pub mod radix_tree;
pub mod search;
pub mod syntax;

pub use buffer::{GapBuffer, SegmentedBuffer};
pub use character::{char_info, previous_char_offset, CharInfo, CharInfoProperties};
pub use config::Config;
pub use error::{Error, Result};
pub use position::{FileFormat, Mark, MarkProperties, Position};
pub use radix_tree::{Lookup, RadixTree};
pub use search::{
    BufferSearch, Range, RegexSearch, SearchData, SearchKind, SearchMatches, SearchOptions,
    TextSearch,
};
pub use syntax::{SyntaxMatch, SyntaxMatches, SyntaxToken};
