//! Declarative pipeline configuration loaded from JSON.
//!
//! The file format keeps every value as a plain string; compiling patterns,
//! decomposing chain strings and validating the whole table happen in one
//! conversion step so a misconfiguration is reported before any file is
//! processed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::chain::parse_chain;
use crate::naming::OutputNamer;
use crate::noparse::NoParseRegistry;
use crate::pattern::Pattern;
use crate::pipeline::{ConfigValidationError, EntrySpec, PipelineConfig};
use crate::rules::{RuleSpec, TransformStep};
use crate::version::VersionString;

/// Default configuration file name searched for in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "pipeline.config.json";

/// Raw pipeline configuration as authored on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineFile {
    /// Named entries, each producing one output artifact.
    #[serde(default)]
    pub entries: Vec<EntryFile>,
    /// Ordered rule table; declaration order is match precedence.
    #[serde(default)]
    pub rules: Vec<RuleFile>,
    /// Patterns exempting matched files from dependency-graph parsing.
    #[serde(default)]
    pub no_parse: Vec<String>,
    /// Project version embedded in artifact names and option templates.
    pub version: String,
    /// Artifact extension override; defaults to `js`.
    #[serde(default)]
    pub extension: Option<String>,
}

/// One named entry in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryFile {
    /// Entry name.
    pub name: String,
    /// Ordered source files rooted at the entry.
    #[serde(default)]
    pub sources: Vec<String>,
}

/// One rule in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleFile {
    /// Pattern a path must satisfy for the rule to apply.
    pub test: String,
    /// Patterns rejecting a path even when `test` matches.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Transform chain, as explicit steps or a single chain string.
    pub transforms: TransformsFile,
}

/// Transform chain syntax accepted in rule declarations.
///
/// Both spellings decompose to the same ordered step list; the chain string
/// exists because hand-authored configurations are shorter that way.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransformsFile {
    /// Single chain string, e.g. `"style-loader!css-loader"`.
    Chain(String),
    /// Explicit list of steps.
    Steps(Vec<StepFile>),
}

/// One explicit transform step in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct StepFile {
    /// Capability name.
    pub name: String,
    /// Options passed through to the capability.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// Errors that can occur while reading the configuration file.
#[derive(Debug)]
pub enum ConfigFileError {
    /// Failed to read the configuration file from disk.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Failed to parse the JSON configuration file.
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
}

impl PipelineFile {
    /// Read a configuration file from a specific path.
    ///
    /// A missing or unparseable file is an error: the pipeline configuration
    /// is the build's source of truth and there is no sensible fallback.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| ConfigFileError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;

        serde_json::from_str(&contents).map_err(|err| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    }

    /// Read [`DEFAULT_CONFIG_FILE`] from the given project root.
    pub fn discover(project_root: &Path) -> Result<Self, ConfigFileError> {
        Self::from_path(project_root.join(DEFAULT_CONFIG_FILE))
    }

    /// Compile patterns, decompose chains and build the validated pipeline.
    pub fn into_pipeline(self) -> Result<PipelineConfig, ConfigValidationError> {
        let version = VersionString::parse(self.version)?;

        let entries = self
            .entries
            .into_iter()
            .map(|entry| EntrySpec::new(entry.name, entry.sources))
            .collect();

        let mut rules = Vec::with_capacity(self.rules.len());
        for rule in self.rules {
            rules.push(rule.into_rule()?);
        }

        let mut no_parse = Vec::with_capacity(self.no_parse.len());
        for pattern in &self.no_parse {
            no_parse.push(Pattern::new(pattern)?);
        }

        let pipeline =
            PipelineConfig::build(entries, rules, NoParseRegistry::new(no_parse), version)?;
        Ok(match self.extension {
            Some(extension) => pipeline.with_output_namer(OutputNamer::new(extension)),
            None => pipeline,
        })
    }
}

impl RuleFile {
    fn into_rule(self) -> Result<RuleSpec, ConfigValidationError> {
        let test = Pattern::new(&self.test)?;

        let mut exclude = Vec::with_capacity(self.exclude.len());
        for pattern in &self.exclude {
            exclude.push(Pattern::new(pattern)?);
        }

        let transforms = match self.transforms {
            TransformsFile::Chain(chain) => parse_chain(&chain)?,
            TransformsFile::Steps(steps) => steps
                .into_iter()
                .map(|step| TransformStep {
                    name: step.name,
                    options: step.options,
                })
                .collect(),
        };

        Ok(RuleSpec {
            test,
            exclude,
            transforms,
        })
    }
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}
