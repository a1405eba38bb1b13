//! Fast-path exemptions from dependency-graph parsing.

use crate::pattern::Pattern;

/// Set of patterns marking files that need no dependency-graph parsing.
///
/// Some sources (e.g. compiler output consumed as a single unit) are known to
/// contain nothing the bundler's module walker should chase. Matching is the
/// registry's only capability; an empty registry exempts nothing.
#[derive(Debug, Clone, Default)]
pub struct NoParseRegistry {
    patterns: Vec<Pattern>,
}

impl NoParseRegistry {
    /// Registry exempting paths matched by any of `patterns`.
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// Whether `path` may skip dependency-graph parsing.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }

    /// Patterns the registry was built from.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}
