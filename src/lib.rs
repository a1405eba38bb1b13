#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod chain;
pub mod config;
pub mod naming;
pub mod noparse;
pub mod pattern;
pub mod pipeline;
pub mod rules;
pub mod version;

pub use chain::{ChainParseError, parse_chain};
pub use config::{ConfigFileError, DEFAULT_CONFIG_FILE, PipelineFile};
pub use naming::OutputNamer;
pub use noparse::NoParseRegistry;
pub use pattern::{Pattern, PatternError};
pub use pipeline::{ConfigValidationError, EntrySpec, PipelineConfig};
pub use rules::{Resolution, ResolutionError, RuleSpec, TransformStep, resolve_chain};
pub use version::{VERSION_TOKEN, VersionError, VersionString};
