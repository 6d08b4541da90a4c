//! Configuration view consumed by the character inspector

use crate::constants::config::DEFAULT_TAB_WIDTH;

/// The subset of editor configuration the core reads. Loading and parsing
/// configuration happens outside the core; this is just the resolved view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    tab_width: usize,
}

impl Config {
    /// Create a configuration with the given tab stop width.
    ///
    /// # Panics
    ///
    /// Panics if `tab_width` is zero.
    pub fn new(tab_width: usize) -> Self {
        assert!(tab_width > 0, "tab width must be positive");
        Self { tab_width }
    }

    /// Tab stop width used to compute the on-screen length of `'\t'`
    #[must_use]
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}
