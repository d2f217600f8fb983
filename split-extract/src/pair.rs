//! Recovering a `{source, test}` pair from a generation response.

use crate::fence::clean_code;
use serde::Deserialize;

/// Generated source code and its accompanying test code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitPair {
    /// Source file contents.
    pub source: String,
    /// Test file contents; empty when no test code was recovered.
    pub test: String,
}

impl SplitPair {
    /// Whether any test code was recovered.
    #[must_use]
    pub fn has_test(&self) -> bool {
        !self.test.is_empty()
    }
}

/// Wire shape of the JSON object the model is asked to return.
#[derive(Debug, Deserialize)]
struct RawPair {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    test: Option<String>,
}

/// Parses `json` as a pair, accepting it only when `source` is non-empty.
fn decode(json: &str) -> Option<SplitPair> {
    let raw: RawPair = serde_json::from_str(json).ok()?;
    let source = raw.source.filter(|s| !s.is_empty())?;
    Some(SplitPair {
        source,
        test: raw.test.unwrap_or_default(),
    })
}

fn whole_document(stripped: &str) -> Option<SplitPair> {
    decode(stripped)
}

/// The outermost `{ ... }` span, provided it mentions a `"source"` key.
fn embedded_object(stripped: &str) -> Option<SplitPair> {
    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if end <= start {
        return None;
    }
    let candidate = &stripped[start..=end];
    if !candidate.contains("\"source\"") {
        return None;
    }
    decode(candidate)
}

type Strategy = fn(&str) -> Option<SplitPair>;

/// Tried in order against the fence-stripped response.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("whole_document", whole_document),
    ("embedded_object", embedded_object),
];

/// Splits a generation response into source and test code.
///
/// The response is fence-stripped and parsed as a `{"source", "test"}`
/// object; failing that, the outermost brace-delimited span is tried. If
/// neither yields a non-empty `source`, the whole unmodified response becomes
/// the source and the test is left empty.
///
/// ```
/// use split_extract::parse_source_and_test;
///
/// let pair = parse_source_and_test(r#"{"source":"package p","test":"package p_test"}"#);
/// assert_eq!(pair.source, "package p");
/// assert_eq!(pair.test, "package p_test");
///
/// let pair = parse_source_and_test("no json here at all");
/// assert_eq!(pair.source, "no json here at all");
/// assert!(!pair.has_test());
/// ```
#[must_use]
pub fn parse_source_and_test(response: &str) -> SplitPair {
    let stripped = clean_code(response);

    for (name, strategy) in STRATEGIES {
        if let Some(pair) = strategy(&stripped) {
            tracing::debug!(
                event = "pair_extracted",
                strategy = name,
                has_test = pair.has_test(),
                "pair_extracted"
            );
            return pair;
        }
    }

    tracing::debug!(
        event = "pair_fallback_raw",
        chars = response.chars().count(),
        "pair_fallback_raw"
    );
    SplitPair {
        source: response.to_string(),
        test: String::new(),
    }
}
