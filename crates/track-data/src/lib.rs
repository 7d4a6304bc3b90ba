//! Data pipeline for doomtrack.
//!
//! Responsible for reading and cleaning raw telemetry logs, deriving
//! per-level completion summaries from the cleaned ticks, and exporting
//! both as CSV artifacts.

pub mod deriver;
pub mod export;
pub mod reader;

pub use track_core as core;
