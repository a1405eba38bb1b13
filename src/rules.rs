//! Rule table mapping source paths to ordered transform chains.
//!
//! Rules are evaluated in declaration order and the first rule whose match
//! pattern accepts a path, and whose exclusions all reject it, wins. Order is
//! the sole tie-break between structurally overlapping rules, so the table
//! behaves identically however many rules could match.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::pattern::Pattern;
use crate::version::VersionString;

/// One invocation of a named transform capability with its options.
///
/// The capability itself (a compiler, a file emitter, a stylesheet loader) is
/// external; the step only carries its name and the options handed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformStep {
  /// Name of the capability to invoke.
  pub name: String,
  /// Opaque options passed through to the capability.
  pub options: BTreeMap<String, String>,
}

impl TransformStep {
  /// Create a step with no options.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      options: BTreeMap::new(),
    }
  }

  /// Add one option, builder style.
  pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.options.insert(key.into(), value.into());
    self
  }

  /// Copy of this step with version placeholders in option values resolved.
  fn resolved(&self, version: &VersionString) -> Self {
    Self {
      name: self.name.clone(),
      options: self
        .options
        .iter()
        .map(|(key, value)| (key.clone(), version.substitute(value)))
        .collect(),
    }
  }
}

/// Declarative mapping from a path pattern to an ordered transform chain.
#[derive(Debug, Clone)]
pub struct RuleSpec {
  /// Pattern a path must satisfy for the rule to apply.
  pub test: Pattern,
  /// Patterns rejecting a path even when `test` matches.
  pub exclude: Vec<Pattern>,
  /// Transform chain applied in declared order; later steps receive the
  /// output of earlier steps.
  pub transforms: Vec<TransformStep>,
}

impl RuleSpec {
  /// Create a rule with no exclusions.
  pub fn new(test: Pattern, transforms: Vec<TransformStep>) -> Self {
    Self {
      test,
      exclude: Vec::new(),
      transforms,
    }
  }

  /// Add an exclusion pattern, builder style.
  pub fn with_exclude(mut self, pattern: Pattern) -> Self {
    self.exclude.push(pattern);
    self
  }

  /// Whether this rule matches `path` and no exclusion rejects it.
  ///
  /// Exclusions take precedence over the match pattern: a path satisfying
  /// both is rejected here and resolution moves on to the next rule.
  fn applies_to(&self, path: &str) -> bool {
    self.test.matches(path) && !self.exclude.iter().any(|pattern| pattern.matches(path))
  }
}

/// Outcome of resolving a path against the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// The first applicable rule's chain, with option templates resolved.
  Transform(Vec<TransformStep>),
  /// No rule applied; the file is delivered to the bundler unmodified.
  PassThrough,
}

impl Resolution {
  /// Steps to apply, if any rule matched.
  pub fn steps(&self) -> Option<&[TransformStep]> {
    match self {
      Self::Transform(steps) => Some(steps),
      Self::PassThrough => None,
    }
  }

  /// Whether the file skips transformation entirely.
  pub fn is_pass_through(&self) -> bool {
    matches!(self, Self::PassThrough)
  }
}

/// Per-file resolution failures.
///
/// These are reported for the offending path only and never abort the
/// processing of other files.
#[derive(Debug)]
pub enum ResolutionError {
  /// The path is not valid Unicode and cannot be tested against patterns.
  NonUnicodePath {
    /// The offending path.
    path: PathBuf,
  },
}

impl std::fmt::Display for ResolutionError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NonUnicodePath { path } => {
        write!(f, "path {} is not valid unicode", path.display())
      }
    }
  }
}

impl std::error::Error for ResolutionError {}

/// Resolve the transform chain for `path` against an ordered rule table.
///
/// Backslash separators are normalised to `/` before matching so that
/// patterns behave identically on paths discovered on Windows. Version
/// placeholders in the winning chain's option values are resolved against
/// `version`; everything else passes through verbatim.
pub fn resolve_chain(
  path: &Path,
  rules: &[RuleSpec],
  version: &VersionString,
) -> Result<Resolution, ResolutionError> {
  let Some(text) = path.to_str() else {
    return Err(ResolutionError::NonUnicodePath {
      path: path.to_path_buf(),
    });
  };
  let text = text.replace('\\', "/");

  for rule in rules {
    if rule.applies_to(&text) {
      let steps = rule
        .transforms
        .iter()
        .map(|step| step.resolved(version))
        .collect();
      return Ok(Resolution::Transform(steps));
    }
  }

  Ok(Resolution::PassThrough)
}
