//! Public error types for go-split.

use split_client::{CallError, ConfigError};
use thiserror::Error;

/// Errors that can occur while planning or generating a split.
///
/// Failures of individual generated files are not errors: a split run
/// records them in its report and carries on with the remaining files.
#[derive(Debug, Error)]
pub enum Error {
    /// The model call failed after the caller gave up.
    #[error("{0}")]
    Call(#[from] CallError),

    /// The caller could not be built from the supplied configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The planning response named no source files.
    #[error("could not determine files to create")]
    NothingPlanned,
}
