//! Tolerant extraction of structured data from model responses.
//!
//! Models rarely answer in exactly the requested shape: JSON arrives wrapped
//! in markdown fences or surrounded by prose, and code comes back fenced.
//! Every function here is pure and total. Each tries an ordered list of
//! strategies, strongest first, and ends in a fallback that always produces
//! a value.
//!
//! - [`parse_filenames`]: planned filenames from a planning response.
//! - [`parse_source_and_test`]: a [`SplitPair`] from a generation response.
//! - [`clean_code`]: code with surrounding whitespace and one fence removed.
//! - [`count_tests_in_code`]: number of test declarations.
//!
//! Naming conventions come from a [`Language`] profile, [`Language::GO`] by
//! default.

#![deny(missing_docs)]

pub mod fence;
pub mod filenames;
pub mod language;
pub mod pair;
pub mod tests_count;

pub use fence::clean_code;
pub use filenames::{parse_filenames, FilenamePlan};
pub use language::Language;
pub use pair::{parse_source_and_test, SplitPair};
pub use tests_count::count_tests_in_code;
