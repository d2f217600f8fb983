//! Counting test declarations in generated code.

use crate::language::Language;

/// Counts lines that, once trimmed, start with the language's test
/// declaration prefix.
///
/// This is a line scan, not a parse: a matching line inside a string or
/// comment counts too.
///
/// ```
/// use split_extract::{count_tests_in_code, Language};
///
/// let code = "func TestA(){}\nfunc TestB(){}\nfunc helper(){}";
/// assert_eq!(count_tests_in_code(code, &Language::GO), 2);
/// ```
#[must_use]
pub fn count_tests_in_code(code: &str, language: &Language) -> usize {
    code.lines()
        .filter(|line| line.trim().starts_with(language.test_prefix))
        .count()
}
