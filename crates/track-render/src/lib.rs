//! Rendering layer for doomtrack.
//!
//! Turns the cleaned tick sequence and level summaries into the stacked
//! timeline plot and composes it with header, caption, labels and footer
//! into the final infographic image. Pure glue over the core dataset: the
//! renderer holds no state of its own and consumes only what the data layer
//! guarantees, ticks indexable by contiguous offset and summaries in
//! completion order.

pub mod compose;
pub mod plot;

pub use track_core as core;
