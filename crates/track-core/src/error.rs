use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the doomtrack pipeline.
///
/// The pipeline is a one-shot batch transformation: every variant is fatal,
/// propagates to the top level and aborts the run. There is no retry path
/// and no partial-output mode.
#[derive(Error, Debug)]
pub enum TrackError {
    /// The input log path does not resolve to a readable file.
    #[error("Log source not found: {0}")]
    SourceNotFound(PathBuf),

    /// Cleaning or derivation produced zero rows / levels.
    #[error("Empty dataset: {0}")]
    EmptyDataset(&'static str),

    /// A field expected to be numeric after cleaning is not. This indicates
    /// a gap in the sentinel-filtering heuristic and is never swallowed.
    #[error("Malformed value in field `{field}` on line {line}: {value:?}")]
    MalformedRow {
        line: u64,
        field: &'static str,
        value: String,
    },

    /// A CSV record could not be read or written.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A JSON document (render layout) could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Plotting or image compositing failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Pass-through for raw I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the doomtrack crates.
pub type Result<T> = std::result::Result<T, TrackError>;
