//! Regular-expression path matching for rule and no-parse patterns.

use regex::Regex;

/// Compiled path matcher with regular-expression semantics.
///
/// A path either satisfies the expression or it does not; there is no fuzzy
/// matching and no case folding beyond what the expression itself requests.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

/// Error raised when a pattern fails to compile.
#[derive(Debug, Clone)]
pub struct PatternError {
    pattern: String,
    source: regex::Error,
}

impl Pattern {
    /// Compile a pattern from its textual form.
    pub fn new(source: impl Into<String>) -> Result<Self, PatternError> {
        let source = source.into();
        match Regex::new(&source) {
            Ok(regex) => Ok(Self { source, regex }),
            Err(err) => Err(PatternError {
                pattern: source,
                source: err,
            }),
        }
    }

    /// Textual form the pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Test whether `path` satisfies the pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PatternError {
    /// The pattern text that failed to compile.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid pattern {:?}: {}", self.pattern, self.source)
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
