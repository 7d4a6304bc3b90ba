//! CSV export of the cleaned dataset.

use std::path::Path;

use tracing::debug;
use track_core::error::Result;
use track_core::models::{LevelSummary, Tick, FIELD_COUNT, FIELD_NAMES};

/// Write the cleaned per-tick dataset, one row per tick with a leading
/// `index` column (the join key downstream consumers use).
pub fn write_ticks_csv(path: &Path, ticks: &[Tick]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = Vec::with_capacity(FIELD_COUNT + 1);
    header.push("index");
    header.extend_from_slice(&FIELD_NAMES);
    writer.write_record(&header)?;

    for (index, tick) in ticks.iter().enumerate() {
        let mut record: Vec<String> = Vec::with_capacity(FIELD_COUNT + 1);
        record.push(index.to_string());
        record.extend(tick.values().iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    debug!("Wrote {} ticks to {}", ticks.len(), path.display());
    Ok(())
}

/// Write the per-level summaries in completion order.
pub fn write_summaries_csv(path: &Path, summaries: &[LevelSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;
    debug!("Wrote {} summaries to {}", summaries.len(), path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deriver::derive_level_summaries;
    use tempfile::TempDir;

    fn tick(map: i64, tics: i64) -> Tick {
        Tick {
            player_health: 100,
            player_armor: 50,
            player_momentum: 0,
            equipped_weapon: 3,
            equipped_ammo: 20,
            ammo_bullet: 50,
            ammo_shell: 20,
            ammo_rocket: 0,
            ammo_cell: 0,
            level_episode_number: 1,
            level_map_number: map,
            level_secret_count: 0,
            level_total_secrets: 3,
            level_kill_count: 10,
            level_monster_count: 40,
            power_ironfeet: 0,
            power_invisibility: 0,
            power_invulnerability: 0,
            power_light: 1,
            power_berserk: 0,
            game_tics: tics,
        }
    }

    // ── write_ticks_csv ───────────────────────────────────────────────────────

    #[test]
    fn test_ticks_csv_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ticks.csv");
        let ticks = vec![tick(1, 35), tick(1, 70)];

        write_ticks_csv(&path, &ticks).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "index");
        assert_eq!(&headers[1], "player_health");
        assert_eq!(&headers[21], "game_tics");

        let rows: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[1][0], "1");
        assert_eq!(&rows[1][21], "70");
    }

    #[test]
    fn test_ticks_csv_empty_dataset_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ticks.csv");

        write_ticks_csv(&path, &[]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), FIELD_COUNT + 1);
        assert_eq!(reader.records().count(), 0);
    }

    // ── write_summaries_csv ───────────────────────────────────────────────────

    #[test]
    fn test_summaries_csv_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summaries.csv");
        let ticks = vec![tick(1, 105), tick(2, 175), tick(3, 350)];
        let summaries = derive_level_summaries(&ticks).unwrap();

        write_summaries_csv(&path, &summaries).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "level_map_number");
        assert_eq!(&headers[4], "hms");

        let rows: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][1], "105");
        assert_eq!(&rows[2][3], "18"); // cumulative_seconds of the last level
        assert_eq!(&rows[2][5], "00:18");
    }
}
