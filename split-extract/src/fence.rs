//! Markdown fence removal.

/// Opening and closing marker of a fenced block.
pub const FENCE: &str = "```";

/// Trims `code` and unwraps one surrounding markdown fence.
///
/// Only text that starts with a fence and spans more than two lines is
/// unwrapped: the opening line (including any info string such as `go` or
/// `json`) is dropped, and the last line is dropped only when it is a bare
/// closing fence. The remaining lines are rejoined without trimming again, so
/// blank lines just inside the fence survive.
///
/// ```
/// use split_extract::clean_code;
///
/// assert_eq!(clean_code("```go\npackage main\n```"), "package main");
/// assert_eq!(clean_code("  package main  "), "package main");
/// ```
#[must_use]
pub fn clean_code(code: &str) -> String {
    let code = code.trim();
    if !code.starts_with(FENCE) {
        return code.to_string();
    }

    let mut lines: Vec<&str> = code.split('\n').collect();
    if lines.len() <= 2 {
        return code.to_string();
    }

    if lines.last().is_some_and(|line| line.trim() == FENCE) {
        lines.pop();
    }
    lines.remove(0);
    lines.join("\n")
}
