//! Per-level completion summaries derived from cleaned ticks.

use std::collections::HashMap;

use track_core::error::{Result, TrackError};
use track_core::formatting::format_duration;
use track_core::models::{LevelSummary, Tick, TIC_RATE};

// ── Public API ────────────────────────────────────────────────────────────────

/// Derive one [`LevelSummary`] per distinct `level_map_number`, in the order
/// the levels first appear in `ticks` (completion order, assuming each level
/// is visited in one contiguous block).
///
/// A level's completion tick is the LAST tick carrying its map number. For a
/// level revisited in two non-contiguous blocks this reports the overall
/// last occurrence, exactly like the source logger's consumer did.
///
/// Pure function of its input: repeat calls yield identical output.
/// Fails with [`TrackError::EmptyDataset`] when `ticks` is empty.
pub fn derive_level_summaries(ticks: &[Tick]) -> Result<Vec<LevelSummary>> {
    if ticks.is_empty() {
        return Err(TrackError::EmptyDataset("no ticks to summarize"));
    }

    // Single pass: first-appearance order plus last-seen tics per level.
    let mut slot_of: HashMap<i64, usize> = HashMap::new();
    let mut completions: Vec<(i64, i64)> = Vec::new();
    for tick in ticks {
        match slot_of.get(&tick.level_map_number) {
            Some(&slot) => completions[slot].1 = tick.game_tics,
            None => {
                slot_of.insert(tick.level_map_number, completions.len());
                completions.push((tick.level_map_number, tick.game_tics));
            }
        }
    }

    let mut cumulative_seconds = 0;
    let mut summaries = Vec::with_capacity(completions.len());
    for (level_map_number, game_tics) in completions {
        let seconds = game_tics / TIC_RATE;
        cumulative_seconds += seconds;
        summaries.push(LevelSummary {
            level_map_number,
            game_tics,
            seconds,
            cumulative_seconds,
            hms: format_duration(seconds),
            cumulative_hms: format_duration(cumulative_seconds),
        });
    }

    Ok(summaries)
}

/// Tick index of each level's last occurrence, in the same order as
/// [`derive_level_summaries`]. These are the x-positions of the completion
/// markers in the rendered timeline.
pub fn completion_indices(ticks: &[Tick]) -> Vec<usize> {
    let mut slot_of: HashMap<i64, usize> = HashMap::new();
    let mut indices: Vec<usize> = Vec::new();
    for (i, tick) in ticks.iter().enumerate() {
        match slot_of.get(&tick.level_map_number) {
            Some(&slot) => indices[slot] = i,
            None => {
                slot_of.insert(tick.level_map_number, indices.len());
                indices.push(i);
            }
        }
    }
    indices
}

// ── Tests ─────────────────────────────────────────────────────────────────────
