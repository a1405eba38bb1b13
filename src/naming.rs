//! Versioned artifact naming for entry outputs.

use crate::version::VersionString;

/// Default artifact extension for bundled entries.
const DEFAULT_EXTENSION: &str = "js";

/// Computes versioned output artifact names for named entries.
///
/// The template is fixed: `<entry>-v<version>.<extension>`. The version is
/// embedded exactly as configured, never truncated or rewritten.
#[derive(Debug, Clone)]
pub struct OutputNamer {
    extension: String,
}

impl OutputNamer {
    /// Namer emitting the provided extension (a leading dot is accepted).
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Artifact name for the given entry.
    pub fn name(&self, entry_name: &str, version: &VersionString) -> String {
        format!("{}-v{}.{}", entry_name, version, self.extension)
    }
}

impl Default for OutputNamer {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::OutputNamer;
    use crate::version::VersionString;

    #[test]
    fn names_follow_the_versioned_template() {
        let namer = OutputNamer::default();
        let version = VersionString::parse("1.2.3").unwrap();
        assert_eq!(namer.name("app", &version), "app-v1.2.3.js");
    }

    #[test]
    fn naming_is_idempotent() {
        let namer = OutputNamer::default();
        let version = VersionString::parse("0.9.0-rc.2").unwrap();
        assert_eq!(namer.name("admin", &version), namer.name("admin", &version));
        assert_eq!(namer.name("admin", &version), "admin-v0.9.0-rc.2.js");
    }

    #[test]
    fn accepts_dotted_extensions() {
        let namer = OutputNamer::new(".mjs");
        let version = VersionString::parse("2.0.0").unwrap();
        assert_eq!(namer.name("app", &version), "app-v2.0.0.mjs");
    }
}
