//! Naming conventions of the target language.

/// File and declaration conventions that extraction keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// Short name, used in prompts and logs.
    pub name: &'static str,
    /// Suffix every source filename ends with, e.g. `.go`.
    pub source_suffix: &'static str,
    /// Prefix of a test declaration once the line is trimmed, e.g. `func Test`.
    pub test_prefix: &'static str,
    /// Suffix that replaces `source_suffix` in a test filename, e.g. `_test.go`.
    pub test_file_suffix: &'static str,
}

impl Language {
    /// Go: `.go` sources, `func Test...` declarations, `_test.go` files.
    pub const GO: Self = Self::new("go", ".go", "func Test", "_test.go");

    /// Creates a language profile.
    #[must_use]
    pub const fn new(
        name: &'static str,
        source_suffix: &'static str,
        test_prefix: &'static str,
        test_file_suffix: &'static str,
    ) -> Self {
        Self {
            name,
            source_suffix,
            test_prefix,
            test_file_suffix,
        }
    }

    /// Whether `filename` looks like a source file of this language.
    #[must_use]
    pub fn is_source_file(&self, filename: &str) -> bool {
        filename.ends_with(self.source_suffix)
    }

    /// Name of the test file that accompanies `filename`.
    ///
    /// ```
    /// use split_extract::Language;
    ///
    /// assert_eq!(Language::GO.test_filename_for("types.go"), "types_test.go");
    /// ```
    #[must_use]
    pub fn test_filename_for(&self, filename: &str) -> String {
        let stem = filename
            .strip_suffix(self.source_suffix)
            .unwrap_or(filename);
        format!("{stem}{}", self.test_file_suffix)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::GO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_profile() {
        let go = Language::default();
        assert_eq!(go, Language::GO);
        assert!(go.is_source_file("handlers.go"));
        assert!(!go.is_source_file("handlers.rs"));
    }

    #[test]
    fn test_filename_for_nested_path() {
        assert_eq!(
            Language::GO.test_filename_for("internal/api/client.go"),
            "internal/api/client_test.go"
        );
    }

    #[test]
    fn test_filename_without_suffix_is_appended() {
        assert_eq!(Language::GO.test_filename_for("README"), "README_test.go");
    }
}
