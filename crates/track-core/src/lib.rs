//! Shared foundation for the doomtrack pipeline.
//!
//! Holds the telemetry data model (raw string rows and validated ticks),
//! the per-level summary record, duration formatting, the error taxonomy
//! and the CLI / render-layout settings shared by all crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
