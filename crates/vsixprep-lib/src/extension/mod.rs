mod list;

pub use list::{load_extension_list, parse_extension_list};

use crate::config::RegistryConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Version placeholder used when an input line does not pin one.
pub const LATEST_VERSION: &str = "latest";

/// Returned when an identifier does not split into exactly `publisher.name`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Invalid extension identifier {identifier:?}: expected exactly one '.' between publisher and name")]
pub struct InvalidIdentifier {
    pub identifier: String,
}

/// One requested extension: marketplace identifier plus version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionRequest {
    pub identifier: String,
    pub version: String,
}

impl ExtensionRequest {
    pub fn new(identifier: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: version.into(),
        }
    }

    /// Parses one extension list line of the form `identifier[=version]`.
    pub fn parse(line: &str) -> Self {
        match line.split_once('=') {
            Some((identifier, version)) => Self {
                identifier: identifier.trim().to_string(),
                version: version.trim().to_string(),
            },
            None => Self {
                identifier: line.trim().to_string(),
                version: LATEST_VERSION.to_string(),
            },
        }
    }

    /// Derives the canonical file name and gallery URL for this request.
    ///
    /// Pure and deterministic: the same request against the same registry
    /// always yields the same target, and no I/O happens here. Identifiers
    /// must contain exactly one `.` separating publisher and name.
    pub fn resolve(&self, registry: &RegistryConfig) -> Result<ResolvedExtension, InvalidIdentifier> {
        let Some((publisher, name)) = self.identifier.split_once('.') else {
            return Err(InvalidIdentifier {
                identifier: self.identifier.clone(),
            });
        };
        if name.contains('.') {
            return Err(InvalidIdentifier {
                identifier: self.identifier.clone(),
            });
        }

        let file_name = format!(
            "{}-{}.vsix",
            self.identifier.replace('.', "-"),
            self.version
        );
        let url = format!(
            "{}/publishers/{publisher}/vsextensions/{name}/{}/vspackage",
            registry.base_url.trim_end_matches('/'),
            self.version
        );

        Ok(ResolvedExtension { file_name, url })
    }
}

/// Concrete download target derived from an [`ExtensionRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedExtension {
    pub file_name: String,
    pub url: String,
}

impl ResolvedExtension {
    pub fn final_path(&self, extensions_dir: &Path) -> PathBuf {
        extensions_dir.join(&self.file_name)
    }

    /// Existence guard: true if the fully written artifact is already on
    /// disk. Best effort only; the atomic rename in the download path is
    /// what actually protects the final name.
    pub fn is_present(&self, extensions_dir: &Path) -> bool {
        self.final_path(extensions_dir).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RegistryConfig {
        RegistryConfig {
            base_url: "https://gallery.test/api".to_string(),
        }
    }

    #[test]
    fn test_parse_defaults_to_latest() {
        let request = ExtensionRequest::parse("ms-python.python");
        assert_eq!(request.identifier, "ms-python.python");
        assert_eq!(request.version, "latest");
    }

    #[test]
    fn test_parse_with_pinned_version() {
        let request = ExtensionRequest::parse("foo.bar=1.2.3");
        assert_eq!(request.identifier, "foo.bar");
        assert_eq!(request.version, "1.2.3");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let request = ExtensionRequest::parse("  foo.bar = 1.2.3 ");
        assert_eq!(request.identifier, "foo.bar");
        assert_eq!(request.version, "1.2.3");
    }

    #[test]
    fn test_resolve_builds_file_name_and_url() {
        let resolved = ExtensionRequest::new("ms-python.python", "latest")
            .resolve(&registry())
            .expect("valid identifier");

        assert_eq!(resolved.file_name, "ms-python-python-latest.vsix");
        assert_eq!(
            resolved.url,
            "https://gallery.test/api/publishers/ms-python/vsextensions/python/latest/vspackage"
        );
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let request = ExtensionRequest::new("foo.bar", "1.2.3");
        let first = request.resolve(&registry()).expect("valid identifier");
        let second = request.resolve(&registry()).expect("valid identifier");
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_rejects_missing_separator() {
        let err = ExtensionRequest::new("badid", "latest")
            .resolve(&registry())
            .expect_err("identifier without separator must fail");
        assert_eq!(err.identifier, "badid");
    }

    #[test]
    fn test_resolve_rejects_multiple_separators() {
        let result = ExtensionRequest::new("too.many.dots", "latest").resolve(&registry());
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_strips_trailing_slash_from_base_url() {
        let registry = RegistryConfig {
            base_url: "https://gallery.test/api/".to_string(),
        };
        let resolved = ExtensionRequest::new("foo.bar", "latest")
            .resolve(&registry)
            .expect("valid identifier");
        assert!(
            resolved
                .url
                .starts_with("https://gallery.test/api/publishers/")
        );
    }

    #[test]
    fn test_is_present_only_matches_regular_files() {
        let temp = tempfile::tempdir().expect("temp dir");
        let resolved = ExtensionRequest::new("foo.bar", "latest")
            .resolve(&registry())
            .expect("valid identifier");

        assert!(!resolved.is_present(temp.path()));

        std::fs::write(resolved.final_path(temp.path()), b"vsix").expect("write");
        assert!(resolved.is_present(temp.path()));
    }
}
