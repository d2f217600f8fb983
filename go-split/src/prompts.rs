//! Prompt text for each step of a split.
//!
//! Every prompt embeds the full file contents it refers to; the model sees no
//! other context.

use crate::splitter::SourceFile;

/// Asks for a JSON array of source filenames to split `source` into.
///
/// When the accompanying test file is given, the model sees both so it can
/// keep functions that are tested together in the same file.
#[must_use]
pub fn plan_prompt(source: &SourceFile, tests: Option<&SourceFile>) -> String {
    match tests {
        Some(tests) => format!(
            r#"Analyze this Go source file AND its test file together.
Return ONLY a JSON array of source filenames to create (not test files - those will be generated to match).

Example response: ["types.go", "helpers.go", "handlers.go"]

Rules:
- Use descriptive names based on content
- Keep related code together (types with their methods)
- Separate helpers from main logic
- Consider test coverage: functions tested together should stay together
- Each output file should have meaningful, testable units

SOURCE FILE ({}):
{}

TEST FILE ({}):
{}"#,
            source.name, source.content, tests.name, tests.content
        ),
        None => format!(
            r#"Analyze this Go file and return ONLY a JSON array of filenames to create.
Example: ["helpers.go", "handlers.go", "types.go"]

Rules:
- Use descriptive names based on content
- Keep related code together
- Separate helpers from main logic

File content:
{}"#,
            source.content
        ),
    }
}

/// Asks for `target` and `test_target` together, as a `{"source", "test"}`
/// JSON object.
#[must_use]
pub fn pair_prompt(
    target: &str,
    test_target: &str,
    source: &SourceFile,
    tests: &SourceFile,
) -> String {
    format!(
        r#"You are splitting a Go file and its tests. Generate BOTH files.

OUTPUT FORMAT - Return exactly this JSON structure:
{{
  "source": "// source code here",
  "test": "// test code here"
}}

SOURCE FILE to split - extract code for {target}:
{}

TEST FILE to split - extract tests for {test_target}:
{}

Rules:
- Include package declaration and imports in both files
- Move tests that test functions/types in the source file to the test file
- Maintain test coverage relationships
- Output valid Go code (no markdown)"#,
        source.content, tests.content
    )
}

/// Asks for the code of `target` alone.
#[must_use]
pub fn source_prompt(target: &str, source: &SourceFile) -> String {
    format!(
        "You are splitting a Go file. Generate {target}.

Source:
{}

Output ONLY valid Go code. Include package and imports. No markdown.",
        source.content
    )
}

/// Asks for skipped test stubs covering the exported functions of `code`.
#[must_use]
pub fn stub_prompt(target: &str, code: &str) -> String {
    format!(
        r#"Generate test stubs for this Go source file.
Each exported function should have a corresponding test stub with t.Skip("TODO: implement").

Source file {target}:
{code}

Output ONLY valid Go test code. Include package and imports. No markdown."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> SourceFile {
        SourceFile::new(name, content)
    }

    #[test]
    fn test_plan_prompt_without_tests() {
        let prompt = plan_prompt(&file("big.go", "package big"), None);
        assert!(prompt.starts_with("Analyze this Go file"));
        assert!(prompt.ends_with("File content:\npackage big"));
        assert!(!prompt.contains("TEST FILE"));
    }

    #[test]
    fn test_plan_prompt_with_tests() {
        let prompt = plan_prompt(
            &file("big.go", "package big"),
            Some(&file("big_test.go", "package big_test")),
        );
        assert!(prompt.contains("SOURCE FILE (big.go):\npackage big"));
        assert!(prompt.contains("TEST FILE (big_test.go):\npackage big_test"));
    }

    #[test]
    fn test_pair_prompt_names_both_targets() {
        let prompt = pair_prompt(
            "types.go",
            "types_test.go",
            &file("big.go", "package big"),
            &file("big_test.go", "package big_test"),
        );
        assert!(prompt.contains("extract code for types.go:\npackage big"));
        assert!(prompt.contains("extract tests for types_test.go:\npackage big_test"));
        assert!(prompt.contains("{\n  \"source\": \"// source code here\","));
    }

    #[test]
    fn test_source_and_stub_prompts() {
        let prompt = source_prompt("types.go", &file("big.go", "package big"));
        assert!(prompt.starts_with("You are splitting a Go file. Generate types.go."));
        assert!(prompt.contains("Source:\npackage big\n"));

        let prompt = stub_prompt("types.go", "package big\n\nfunc Exported() {}");
        assert!(prompt.contains("Source file types.go:\npackage big"));
        assert!(prompt.contains(r#"t.Skip("TODO: implement")"#));
    }
}
