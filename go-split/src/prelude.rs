//! Common imports for go-split usage.
//!
//! ```
//! use go_split::prelude::*;
//! ```

pub use crate::errors::Error;
pub use crate::splitter::{
    FileStatus, GeneratedFile, GeneratedPair, SourceFile, SplitReport, SplitRequest, Splitter,
};

// Caller configuration and outcomes
pub use split_client::{CallError, ClientConfig, FailureKind, ResilientCaller, RetryPolicy};

// Extraction entry points for callers driving the model themselves
pub use split_extract::{
    clean_code, count_tests_in_code, parse_filenames, parse_source_and_test, Language, SplitPair,
};
