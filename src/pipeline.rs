//! Composition root tying entries, rules, parse exemptions and the project
//! version into one immutable build configuration.

use std::collections::BTreeSet;
use std::path::Path;

use crate::chain::ChainParseError;
use crate::naming::OutputNamer;
use crate::noparse::NoParseRegistry;
use crate::pattern::PatternError;
use crate::rules::{Resolution, ResolutionError, RuleSpec, resolve_chain};
use crate::version::{VersionError, VersionString};

/// Named entry producing exactly one output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpec {
  /// Entry name, unique across the configuration.
  pub name: String,
  /// Ordered source files rooted at this entry.
  pub sources: Vec<String>,
}

impl EntrySpec {
  /// Create a named entry from its ordered source list.
  pub fn new(name: impl Into<String>, sources: Vec<String>) -> Self {
    Self {
      name: name.into(),
      sources,
    }
  }
}

/// Errors raised while constructing a [`PipelineConfig`].
///
/// Construction fails before a single file is resolved and no partial
/// configuration is usable afterwards.
#[derive(Debug)]
pub enum ConfigValidationError {
  /// A rule declared no transform steps.
  EmptyTransformChain {
    /// Match pattern identifying the offending rule.
    rule: String,
  },
  /// Two entries share the same name.
  DuplicateEntry {
    /// The duplicated entry name.
    name: String,
  },
  /// An entry was declared with an empty name.
  EmptyEntryName,
  /// The configured version is unusable.
  Version(VersionError),
  /// A rule or no-parse pattern failed to compile.
  Pattern(PatternError),
  /// A loader-chain string could not be decomposed.
  Chain(ChainParseError),
}

impl std::fmt::Display for ConfigValidationError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::EmptyTransformChain { rule } => {
        write!(f, "rule {rule:?} declares an empty transform chain")
      }
      Self::DuplicateEntry { name } => {
        write!(f, "entry {name:?} is declared more than once")
      }
      Self::EmptyEntryName => write!(f, "entry names must not be empty"),
      Self::Version(source) => write!(f, "invalid version: {source}"),
      Self::Pattern(source) => source.fmt(f),
      Self::Chain(source) => source.fmt(f),
    }
  }
}

impl std::error::Error for ConfigValidationError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Version(source) => Some(source),
      Self::Pattern(source) => Some(source),
      Self::Chain(source) => Some(source),
      _ => None,
    }
  }
}

impl From<VersionError> for ConfigValidationError {
  fn from(source: VersionError) -> Self {
    Self::Version(source)
  }
}

impl From<PatternError> for ConfigValidationError {
  fn from(source: PatternError) -> Self {
    Self::Pattern(source)
  }
}

impl From<ChainParseError> for ConfigValidationError {
  fn from(source: ChainParseError) -> Self {
    Self::Chain(source)
  }
}

/// Immutable build configuration consumed by the bundler runtime.
///
/// Built once at startup. Every query afterwards reads shared immutable data,
/// so per-file resolution may run concurrently without locking.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
  entries: Vec<EntrySpec>,
  rules: Vec<RuleSpec>,
  no_parse: NoParseRegistry,
  version: VersionString,
  namer: OutputNamer,
}

impl PipelineConfig {
  /// Validate and assemble the full pipeline configuration.
  ///
  /// Entry names must be unique and non-empty, and every rule must declare at
  /// least one transform step. Rule order is preserved exactly as supplied;
  /// it is the match precedence during resolution.
  pub fn build(
    entries: Vec<EntrySpec>,
    rules: Vec<RuleSpec>,
    no_parse: NoParseRegistry,
    version: VersionString,
  ) -> Result<Self, ConfigValidationError> {
    let mut seen = BTreeSet::new();
    for entry in &entries {
      if entry.name.is_empty() {
        return Err(ConfigValidationError::EmptyEntryName);
      }
      if !seen.insert(entry.name.as_str()) {
        return Err(ConfigValidationError::DuplicateEntry {
          name: entry.name.clone(),
        });
      }
    }

    for rule in &rules {
      if rule.transforms.is_empty() {
        return Err(ConfigValidationError::EmptyTransformChain {
          rule: rule.test.source().to_string(),
        });
      }
    }

    Ok(Self {
      entries,
      rules,
      no_parse,
      version,
      namer: OutputNamer::default(),
    })
  }

  /// Replace the output namer, builder style.
  pub fn with_output_namer(mut self, namer: OutputNamer) -> Self {
    self.namer = namer;
    self
  }

  /// Transform chain for a candidate source path, or pass-through.
  pub fn transforms_for(&self, path: &Path) -> Result<Resolution, ResolutionError> {
    resolve_chain(path, &self.rules, &self.version)
  }

  /// Whether a path may skip dependency-graph parsing.
  pub fn is_parse_exempt(&self, path: &str) -> bool {
    self.no_parse.is_exempt(path)
  }

  /// Versioned artifact name for one entry name.
  pub fn artifact_name(&self, entry_name: &str) -> String {
    self.namer.name(entry_name, &self.version)
  }

  /// Entry names paired with their artifact names, in declaration order.
  pub fn artifact_names(&self) -> impl Iterator<Item = (&str, String)> + '_ {
    self
      .entries
      .iter()
      .map(|entry| (entry.name.as_str(), self.artifact_name(&entry.name)))
  }

  /// Look up a declared entry by name.
  pub fn entry(&self, name: &str) -> Option<&EntrySpec> {
    self.entries.iter().find(|entry| entry.name == name)
  }

  /// Declared entries, in declaration order.
  pub fn entries(&self) -> &[EntrySpec] {
    &self.entries
  }

  /// The rule table, in match-precedence order.
  pub fn rules(&self) -> &[RuleSpec] {
    &self.rules
  }

  /// The configured project version.
  pub fn version(&self) -> &VersionString {
    &self.version
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pattern::Pattern;
  use crate::rules::TransformStep;

  fn version() -> VersionString {
    VersionString::parse("1.2.3").unwrap()
  }

  fn app_entry() -> EntrySpec {
    EntrySpec::new("app", vec![String::from("./src/index.js")])
  }

  fn elm_rules() -> Vec<RuleSpec> {
    vec![
      RuleSpec::new(
        Pattern::new(r"\.elm$").unwrap(),
        vec![TransformStep::new("elm-compiler")],
      )
      .with_exclude(Pattern::new("elm-stuff").unwrap()),
    ]
  }

  #[test]
  fn builds_a_queryable_configuration() {
    let pipeline = PipelineConfig::build(
      vec![app_entry()],
      elm_rules(),
      NoParseRegistry::new(vec![Pattern::new(r"\.elm$").unwrap()]),
      version(),
    )
    .unwrap();

    assert_eq!(pipeline.artifact_name("app"), "app-v1.2.3.js");
    assert!(pipeline.is_parse_exempt("src/Main.elm"));
    assert!(!pipeline.is_parse_exempt("src/styles.css"));

    let outcome = pipeline
      .transforms_for(Path::new("src/Main.elm"))
      .unwrap();
    assert_eq!(outcome.steps().unwrap()[0].name, "elm-compiler");

    assert_eq!(pipeline.entry("app").unwrap().sources.len(), 1);
    assert!(pipeline.entry("admin").is_none());
  }

  #[test]
  fn rejects_duplicate_entry_names() {
    let err = PipelineConfig::build(
      vec![app_entry(), app_entry()],
      elm_rules(),
      NoParseRegistry::default(),
      version(),
    )
    .unwrap_err();

    assert!(matches!(
      err,
      ConfigValidationError::DuplicateEntry { name } if name == "app"
    ));
  }

  #[test]
  fn rejects_empty_entry_names() {
    let err = PipelineConfig::build(
      vec![EntrySpec::new("", Vec::new())],
      elm_rules(),
      NoParseRegistry::default(),
      version(),
    )
    .unwrap_err();

    assert!(matches!(err, ConfigValidationError::EmptyEntryName));
  }

  #[test]
  fn rejects_rules_without_transforms() {
    let rules = vec![RuleSpec::new(Pattern::new(r"\.css$").unwrap(), Vec::new())];
    let err = PipelineConfig::build(
      vec![app_entry()],
      rules,
      NoParseRegistry::default(),
      version(),
    )
    .unwrap_err();

    assert!(matches!(
      err,
      ConfigValidationError::EmptyTransformChain { rule } if rule == r"\.css$"
    ));
  }

  #[test]
  fn artifact_names_follow_entry_declaration_order() {
    let pipeline = PipelineConfig::build(
      vec![
        EntrySpec::new("app", Vec::new()),
        EntrySpec::new("admin", Vec::new()),
      ],
      elm_rules(),
      NoParseRegistry::default(),
      version(),
    )
    .unwrap();

    let names: Vec<(&str, String)> = pipeline.artifact_names().collect();
    assert_eq!(names, vec![
      ("app", String::from("app-v1.2.3.js")),
      ("admin", String::from("admin-v1.2.3.js")),
    ]);
  }
}
