//! Recovering the list of planned filenames from a planning response.

use crate::language::Language;

/// Characters stripped from each element of a bracketed list.
const LIST_ITEM_TRIM: &[char] = &[' ', '"', '\'', '\t', '\n'];

/// Characters stripped from each whitespace-separated word.
const WORD_TRIM: &[char] = &['"', '\'', ',', '[', ']'];

/// Filenames proposed by the model, in the order they first appeared.
///
/// Duplicates are kept; deciding what a repeated name means is up to the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenamePlan(Vec<String>);

impl FilenamePlan {
    /// The proposed filenames.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.0
    }

    /// Number of proposed filenames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing usable was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the proposed filenames.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Consumes the plan, returning the filenames.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for FilenamePlan {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FilenamePlan {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<String>> for FilenamePlan {
    fn from(files: Vec<String>) -> Self {
        Self(files)
    }
}

type Strategy = fn(&str, &Language) -> Vec<String>;

/// Tried in order; the first non-empty result wins.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("bracketed_list", from_bracketed_list),
    ("words", from_words),
];

/// Extracts source filenames from a free-form planning response.
///
/// The span between the first `[` and the last `]` is read as a
/// comma-separated list first. Only when that yields nothing is the whole
/// response scanned word by word. Either way, only names ending in the
/// language's source suffix are kept.
///
/// ```
/// use split_extract::{parse_filenames, Language};
///
/// let plan = parse_filenames(r#"["types.go", "helpers.go"]"#, &Language::GO);
/// assert_eq!(plan.files(), ["types.go", "helpers.go"]);
///
/// let plan = parse_filenames("Create types.go and helpers.go", &Language::GO);
/// assert_eq!(plan.files(), ["types.go", "helpers.go"]);
/// ```
#[must_use]
pub fn parse_filenames(response: &str, language: &Language) -> FilenamePlan {
    for (name, strategy) in STRATEGIES {
        let files = strategy(response, language);
        if !files.is_empty() {
            tracing::debug!(
                event = "filenames_extracted",
                strategy = name,
                count = files.len(),
                "filenames_extracted"
            );
            return FilenamePlan(files);
        }
    }
    tracing::debug!(event = "filenames_not_found", "filenames_not_found");
    FilenamePlan::default()
}

fn from_bracketed_list(response: &str, language: &Language) -> Vec<String> {
    let (Some(start), Some(end)) = (response.find('['), response.rfind(']')) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }

    response[start + 1..end]
        .split(',')
        .map(|item| item.trim_matches(LIST_ITEM_TRIM))
        .filter(|item| language.is_source_file(item))
        .map(str::to_string)
        .collect()
}

fn from_words(response: &str, language: &Language) -> Vec<String> {
    response
        .split_whitespace()
        .map(|word| word.trim_matches(WORD_TRIM))
        .filter(|word| language.is_source_file(word))
        .map(str::to_string)
        .collect()
}
