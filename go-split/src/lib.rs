//! # go-split
//!
//! Split a large Go file into smaller ones with the help of an LLM.
//!
//! A [`Splitter`](splitter::Splitter) asks the model for a plan (a list of
//! filenames), then generates each planned file, together with its tests
//! when a test file exists or followed by test stubs when none does. Calls go
//! through [`split_client`], which retries transient failures under one
//! deadline; responses are decoded with the tolerant parsers of
//! [`split_extract`].
//!
//! ## Example
//!
//! ```no_run
//! # use go_split::prelude::*;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let splitter = Splitter::from_env()?;
//! let request = SplitRequest::new(SourceFile::new("server.go", std::fs::read_to_string("server.go")?));
//!
//! let report = splitter.split(&request).await?;
//! for file in report.generated() {
//!     println!("{} ({} lines)", file.name, file.lines);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Nothing is written to disk; the report carries every generated file's
//! contents.

#![deny(missing_docs)]

/// Output token budgets.
pub mod budget;

/// Public error types.
pub mod errors;

/// Prompt builders.
pub mod prompts;

/// Split session.
pub mod splitter;

/// Commonly used types.
pub mod prelude;

pub use split_client;
pub use split_extract;
