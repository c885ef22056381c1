//! Serialization options and traversal limits.

use bitflags::bitflags;

bitflags! {
    /// Flags accepted by every `serialize` entry point.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Options: u32 {
        /// Emit fields and elements that still hold their default baseline.
        const WITH_DEFAULTS = 1 << 1;
        /// Backend-specific human-friendly layout. No semantic effect.
        const PRETTY_PRINT  = 1 << 2;
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::empty()
    }
}

/// Bounds on a single serialize/deserialize walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of records, lists, maps and variants.
    pub max_depth: usize,
}

impl Limits {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_combine() {
        let opts = Options::WITH_DEFAULTS | Options::PRETTY_PRINT;
        assert!(opts.contains(Options::WITH_DEFAULTS));
        assert!(opts.contains(Options::PRETTY_PRINT));
        assert!(!Options::default().contains(Options::WITH_DEFAULTS));
    }

    #[test]
    fn default_limits() {
        assert_eq!(Limits::default().max_depth, 128);
        assert_eq!(Limits::new(3).max_depth, 3);
    }
}
