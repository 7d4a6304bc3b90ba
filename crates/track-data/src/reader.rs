//! Telemetry log loading and cleaning.
//!
//! Reads the delimited per-tick log produced by the session logger
//! (optionally gzip-compressed) and turns it into a validated, deduplicated,
//! zero-indexed sequence of [`Tick`] records for downstream derivation.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::{debug, warn};
use track_core::error::{Result, TrackError};
use track_core::models::{RawLogRow, Tick, FIELD_COUNT, SENTINEL};
use track_core::settings::CleanOptions;

/// Lines of preamble before the first data row.
const PREAMBLE_LINES: usize = 2;

/// First raw column carrying a telemetry field; the columns before it hold
/// logger timecodes and are ignored.
const FIELD_OFFSET: usize = 2;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a raw telemetry log and clean it into per-tick records.
///
/// Cleaning runs in a fixed order: trailing junk is truncated at the last
/// sentinel-tagged `game_tics` row, sentinel-health rows are filtered out,
/// the survivors are coerced to integers, exact duplicates are dropped
/// (first occurrence wins) and the result is reindexed from zero. When
/// `opts.start_health` is set, the first tick's `player_health` is
/// overwritten with it.
///
/// Fails with [`TrackError::SourceNotFound`] when `path` does not resolve,
/// [`TrackError::EmptyDataset`] when nothing survives cleaning and
/// [`TrackError::MalformedRow`] when a surviving field is not numeric.
pub fn load_and_clean(path: &Path, opts: &CleanOptions) -> Result<Vec<Tick>> {
    let rows = read_raw_rows(path)?;
    let read = rows.len();

    let rows = truncate_trailing_junk(rows);
    let truncated = read - rows.len();

    let rows: Vec<RawLogRow> = rows
        .into_iter()
        .filter(|row| row.player_health() != SENTINEL)
        .collect();
    let kept = rows.len();

    let mut seen: HashSet<Tick> = HashSet::new();
    let mut ticks: Vec<Tick> = Vec::with_capacity(rows.len());
    for row in &rows {
        let tick = Tick::try_from(row)?;
        if seen.insert(tick.clone()) {
            ticks.push(tick);
        }
    }

    debug!(
        "Log {}: {} rows read, {} truncated, {} kept after filtering, {} after dedup",
        path.display(),
        read,
        truncated,
        kept,
        ticks.len()
    );

    if ticks.is_empty() {
        return Err(TrackError::EmptyDataset("no rows survived cleaning"));
    }

    if let Some(health) = opts.start_health {
        ticks[0].player_health = health;
    }

    warn_if_tics_decrease(&ticks);

    Ok(ticks)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Open the log for reading, transparently decompressing `.gz` files.
fn open_source(path: &Path) -> Result<Box<dyn Read>> {
    if !path.is_file() {
        return Err(TrackError::SourceNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let gz = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));
    if gz {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Parse the log into raw string rows, skipping the preamble and the
/// timecode columns.
///
/// Rows too short to carry the full field payload are structurally invalid
/// and are stripped here, before any value-level cleaning.
fn read_raw_rows(path: &Path) -> Result<Vec<RawLogRow>> {
    let source = open_source(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(source));

    let mut rows: Vec<RawLogRow> = Vec::new();
    for (i, result) in reader.records().enumerate() {
        if i < PREAMBLE_LINES {
            continue;
        }
        let record = result?;
        let line = (i + 1) as u64;

        if record.len() < FIELD_OFFSET + FIELD_COUNT {
            debug!(
                "Line {}: {} columns, expected at least {}; dropping",
                line,
                record.len(),
                FIELD_OFFSET + FIELD_COUNT
            );
            continue;
        }

        let values: [String; FIELD_COUNT] =
            std::array::from_fn(|f| record[FIELD_OFFSET + f].trim().to_string());
        rows.push(RawLogRow { line, values });
    }

    Ok(rows)
}

/// Discard the last sentinel-tagged `game_tics` row and everything after it.
///
/// The logger sometimes emits junk after real gameplay ends, and that junk
/// always appears after the final sentinel-tagged row, so the last sentinel
/// bounds the valid region. Without a sentinel row nothing is truncated.
fn truncate_trailing_junk(rows: Vec<RawLogRow>) -> Vec<RawLogRow> {
    match rows.iter().rposition(|row| row.game_tics() == SENTINEL) {
        Some(last) => {
            let mut rows = rows;
            rows.truncate(last);
            rows
        }
        None => rows,
    }
}

/// `game_tics` must not decrease across a cleaned sequence. A violation is
/// a data-quality warning, not an error: downstream derivation still works.
fn warn_if_tics_decrease(ticks: &[Tick]) {
    if let Some(i) = ticks
        .windows(2)
        .position(|pair| pair[1].game_tics < pair[0].game_tics)
    {
        warn!(
            "game_tics decreases at index {}: {} -> {}",
            i + 1,
            ticks[i].game_tics,
            ticks[i + 1].game_tics
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
