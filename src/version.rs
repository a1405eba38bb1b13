//! Version handling shared by output naming and transform options.
//!
//! The version is supplied once from project metadata when the pipeline is
//! configured and flows everywhere as an explicit parameter. Nothing in this
//! crate reads it from ambient process state.

use std::fmt;

/// Placeholder token replaced with the configured version inside transform
/// option values.
pub const VERSION_TOKEN: &str = "[version]";

/// Validated project version embedded in artifact names and option templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionString(String);

/// Errors produced while validating a version value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
  /// The supplied version was empty.
  Empty,
  /// The supplied version contained a character unusable in file names.
  InvalidCharacter {
    /// Rejected version value.
    value: String,
    /// The character that caused the rejection.
    found: char,
  },
}

impl VersionString {
  /// Validate and wrap a version value.
  ///
  /// Versions end up embedded verbatim in artifact file names, so path
  /// separators and whitespace are rejected.
  pub fn parse(value: impl Into<String>) -> Result<Self, VersionError> {
    let value = value.into();
    if value.is_empty() {
      return Err(VersionError::Empty);
    }

    let invalid = value
      .chars()
      .find(|c| matches!(c, '/' | '\\') || c.is_whitespace());
    if let Some(found) = invalid {
      return Err(VersionError::InvalidCharacter { value, found });
    }

    Ok(Self(value))
  }

  /// Borrow the underlying version text.
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Replace every [`VERSION_TOKEN`] occurrence in `template` with this version.
  ///
  /// Other bracketed tokens (`[name]`, `[ext]`, ...) belong to the transform
  /// capability that receives the option and pass through untouched.
  pub fn substitute(&self, template: &str) -> String {
    template.replace(VERSION_TOKEN, &self.0)
  }
}

impl fmt::Display for VersionString {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Empty => write!(f, "version must not be empty"),
      Self::InvalidCharacter { value, found } => {
        write!(f, "version {value:?} contains invalid character {found:?}")
      }
    }
  }
}

impl std::error::Error for VersionError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_semantic_versions() {
    let version = VersionString::parse("1.2.3").unwrap();
    assert_eq!(version.as_str(), "1.2.3");
    assert_eq!(version.to_string(), "1.2.3");
  }

  #[test]
  fn accepts_prerelease_tags() {
    assert!(VersionString::parse("2.0.0-rc.1").is_ok());
  }

  #[test]
  fn rejects_empty_versions() {
    assert_eq!(VersionString::parse(""), Err(VersionError::Empty));
  }

  #[test]
  fn rejects_path_separators() {
    let err = VersionString::parse("1.0/0").unwrap_err();
    assert!(matches!(err, VersionError::InvalidCharacter { found: '/', .. }));

    let err = VersionString::parse("1.0\\0").unwrap_err();
    assert!(matches!(err, VersionError::InvalidCharacter { found: '\\', .. }));
  }

  #[test]
  fn rejects_whitespace() {
    let err = VersionString::parse("1.0 beta").unwrap_err();
    assert!(matches!(err, VersionError::InvalidCharacter { found: ' ', .. }));
  }

  #[test]
  fn substitutes_version_token() {
    let version = VersionString::parse("3.1.4").unwrap();
    assert_eq!(version.substitute("replace=[version]"), "replace=3.1.4");
    assert_eq!(
      version.substitute("[version]/[version]"),
      "3.1.4/3.1.4"
    );
  }

  #[test]
  fn leaves_foreign_tokens_untouched() {
    let version = VersionString::parse("3.1.4").unwrap();
    assert_eq!(version.substitute("name=[name].[ext]"), "name=[name].[ext]");
  }
}
