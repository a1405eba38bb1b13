//! Decomposition of loader-chain strings into explicit transform steps.
//!
//! Bundler configurations conventionally pack an ordered, optioned pipeline
//! into a single string such as
//! `"file-emitter?name=[name].[ext]!string-replace?search=a&replace=b"`.
//! Chains are decomposed once at configuration-load time so that chain
//! semantics stay testable independently of the string syntax.

use std::collections::BTreeMap;

use crate::rules::TransformStep;

/// Separator between chained transform invocations.
const STEP_SEPARATOR: char = '!';
/// Separator between a transform name and its option query.
const OPTIONS_SEPARATOR: char = '?';

/// Errors produced while decomposing a loader-chain string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainParseError {
    /// The chain contained no steps at all.
    Empty,
    /// A step between separators had no transform name.
    EmptyStep {
        /// Zero-based position of the step within the chain.
        index: usize,
    },
    /// An option pair had an empty key.
    EmptyOptionKey {
        /// Name of the step whose options were malformed.
        step: String,
    },
}

/// Parse a chain string into its ordered transform steps.
///
/// Steps apply in written order. Each step's query options are opaque
/// key/value pairs; a bare key is shorthand for the flag value `"true"`, and
/// a repeated key keeps its last value.
pub fn parse_chain(value: &str) -> Result<Vec<TransformStep>, ChainParseError> {
    if value.trim().is_empty() {
        return Err(ChainParseError::Empty);
    }

    let mut steps = Vec::new();
    for (index, raw) in value.split(STEP_SEPARATOR).enumerate() {
        let raw = raw.trim();
        let (name, query) = match raw.split_once(OPTIONS_SEPARATOR) {
            Some((name, query)) => (name, Some(query)),
            None => (raw, None),
        };
        if name.is_empty() {
            return Err(ChainParseError::EmptyStep { index });
        }

        let mut options = BTreeMap::new();
        if let Some(query) = query {
            for pair in query.split('&').filter(|pair| !pair.is_empty()) {
                let (key, value) = match pair.split_once('=') {
                    Some((key, value)) => (key, value.to_string()),
                    None => (pair, String::from("true")),
                };
                if key.is_empty() {
                    return Err(ChainParseError::EmptyOptionKey {
                        step: name.to_string(),
                    });
                }
                options.insert(key.to_string(), value);
            }
        }

        steps.push(TransformStep {
            name: name.to_string(),
            options,
        });
    }

    Ok(steps)
}

impl std::fmt::Display for ChainParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "transform chain is empty"),
            Self::EmptyStep { index } => {
                write!(f, "transform chain step {index} has no name")
            }
            Self::EmptyOptionKey { step } => {
                write!(f, "transform {step:?} has an option with an empty key")
            }
        }
    }
}

impl std::error::Error for ChainParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_chain_in_written_order() {
        let steps = parse_chain("style-loader!css-loader").unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].name, "style-loader");
        assert_eq!(steps[1].name, "css-loader");
        assert!(steps[0].options.is_empty());
        assert!(steps[1].options.is_empty());
    }

    #[test]
    fn parses_single_step_with_options() {
        let steps = parse_chain("elm-compiler?verbose=true&warn=true&debug=true").unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].options["verbose"], "true");
        assert_eq!(steps[0].options["warn"], "true");
        assert_eq!(steps[0].options["debug"], "true");
    }

    #[test]
    fn keeps_bracketed_tokens_in_values() {
        let steps =
            parse_chain("file-emitter?name=[name].[ext]!string-replace?search=XXXYYYZZZ&replace=[version]")
                .unwrap();
        assert_eq!(steps[0].options["name"], "[name].[ext]");
        assert_eq!(steps[1].options["search"], "XXXYYYZZZ");
        assert_eq!(steps[1].options["replace"], "[version]");
    }

    #[test]
    fn bare_keys_become_flags() {
        let steps = parse_chain("elm-compiler?verbose&warn=false").unwrap();
        assert_eq!(steps[0].options["verbose"], "true");
        assert_eq!(steps[0].options["warn"], "false");
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let steps = parse_chain("string-replace?search=a=b").unwrap();
        assert_eq!(steps[0].options["search"], "a=b");
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let steps = parse_chain("loader?flag=1&flag=2").unwrap();
        assert_eq!(steps[0].options["flag"], "2");
    }

    #[test]
    fn rejects_empty_chains() {
        assert_eq!(parse_chain(""), Err(ChainParseError::Empty));
        assert_eq!(parse_chain("   "), Err(ChainParseError::Empty));
    }

    #[test]
    fn rejects_nameless_steps() {
        assert_eq!(
            parse_chain("style-loader!!css-loader"),
            Err(ChainParseError::EmptyStep { index: 1 })
        );
        assert_eq!(
            parse_chain("?opt=1"),
            Err(ChainParseError::EmptyStep { index: 0 })
        );
    }

    #[test]
    fn rejects_empty_option_keys() {
        assert_eq!(
            parse_chain("loader?=value"),
            Err(ChainParseError::EmptyOptionKey {
                step: String::from("loader")
            })
        );
    }
}
