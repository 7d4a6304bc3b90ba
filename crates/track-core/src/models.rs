use serde::Serialize;

use crate::error::TrackError;

/// Simulation logic rate of the source engine, in tics per second.
pub const TIC_RATE: i64 = 35;

/// Marker emitted by the logger for "value not yet available".
pub const SENTINEL: &str = "?????";

/// Number of telemetry fields carried by every logged sample.
pub const FIELD_COUNT: usize = 21;

/// Telemetry field names in wire order (columns 2–22 of the raw log).
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "player_health",
    "player_armor",
    "player_momentum",
    "equipped_weapon",
    "equipped_ammo",
    "ammo_bullet",
    "ammo_shell",
    "ammo_rocket",
    "ammo_cell",
    "level_episode_number",
    "level_map_number",
    "level_secret_count",
    "level_total_secrets",
    "level_kill_count",
    "level_monster_count",
    "power_ironfeet",
    "power_invisibility",
    "power_invulnerability",
    "power_light",
    "power_berserk",
    "game_tics",
];

// ── RawLogRow ─────────────────────────────────────────────────────────────────

/// One logged sample exactly as read from the log: all fields are strings
/// because the sentinel marker may appear in otherwise-numeric columns.
///
/// Conversion to the numeric form is explicit and fallible; see
/// [`Tick::try_from`]. Nothing downstream may treat a raw field as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLogRow {
    /// 1-based line number in the source log, kept for error reporting.
    pub line: u64,
    /// Field values in [`FIELD_NAMES`] order.
    pub values: [String; FIELD_COUNT],
}

impl RawLogRow {
    /// The raw `player_health` field (sentinel-checked during cleaning).
    pub fn player_health(&self) -> &str {
        &self.values[0]
    }

    /// The raw `game_tics` field (sentinel-checked during truncation).
    pub fn game_tics(&self) -> &str {
        &self.values[20]
    }
}

// ── Tick ──────────────────────────────────────────────────────────────────────

/// One simulation time-step's worth of validated game state.
///
/// All fields are integers; the `power_*` fields are semantically boolean
/// (0/1). A cleaned sequence of ticks is ordered by original log order and
/// its zero-based position in the containing `Vec` is the join key used by
/// downstream consumers; there is no real timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tick {
    pub player_health: i64,
    pub player_armor: i64,
    pub player_momentum: i64,
    pub equipped_weapon: i64,
    pub equipped_ammo: i64,
    pub ammo_bullet: i64,
    pub ammo_shell: i64,
    pub ammo_rocket: i64,
    pub ammo_cell: i64,
    pub level_episode_number: i64,
    pub level_map_number: i64,
    pub level_secret_count: i64,
    pub level_total_secrets: i64,
    pub level_kill_count: i64,
    pub level_monster_count: i64,
    pub power_ironfeet: i64,
    pub power_invisibility: i64,
    pub power_invulnerability: i64,
    pub power_light: i64,
    pub power_berserk: i64,
    /// Elapsed simulation tics since session start; non-decreasing across a
    /// cleaned sequence.
    pub game_tics: i64,
}

impl Tick {
    /// Field values in [`FIELD_NAMES`] wire order, for tabular export.
    pub fn values(&self) -> [i64; FIELD_COUNT] {
        [
            self.player_health,
            self.player_armor,
            self.player_momentum,
            self.equipped_weapon,
            self.equipped_ammo,
            self.ammo_bullet,
            self.ammo_shell,
            self.ammo_rocket,
            self.ammo_cell,
            self.level_episode_number,
            self.level_map_number,
            self.level_secret_count,
            self.level_total_secrets,
            self.level_kill_count,
            self.level_monster_count,
            self.power_ironfeet,
            self.power_invisibility,
            self.power_invulnerability,
            self.power_light,
            self.power_berserk,
            self.game_tics,
        ]
    }
}

impl TryFrom<&RawLogRow> for Tick {
    type Error = TrackError;

    /// Coerce every field of a raw row to `i64`.
    ///
    /// Fails with [`TrackError::MalformedRow`] on the first non-numeric
    /// field. After sentinel truncation and filtering this should not occur;
    /// when it does it is a data-integrity fault, not a recoverable
    /// condition.
    fn try_from(row: &RawLogRow) -> Result<Self, Self::Error> {
        let mut n = [0i64; FIELD_COUNT];
        for (i, raw) in row.values.iter().enumerate() {
            n[i] = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| TrackError::MalformedRow {
                    line: row.line,
                    field: FIELD_NAMES[i],
                    value: raw.clone(),
                })?;
        }

        Ok(Tick {
            player_health: n[0],
            player_armor: n[1],
            player_momentum: n[2],
            equipped_weapon: n[3],
            equipped_ammo: n[4],
            ammo_bullet: n[5],
            ammo_shell: n[6],
            ammo_rocket: n[7],
            ammo_cell: n[8],
            level_episode_number: n[9],
            level_map_number: n[10],
            level_secret_count: n[11],
            level_total_secrets: n[12],
            level_kill_count: n[13],
            level_monster_count: n[14],
            power_ironfeet: n[15],
            power_invisibility: n[16],
            power_invulnerability: n[17],
            power_light: n[18],
            power_berserk: n[19],
            game_tics: n[20],
        })
    }
}

// ── LevelSummary ──────────────────────────────────────────────────────────────

/// Completion record for one visited level, in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    /// Numeric id of the level.
    pub level_map_number: i64,
    /// Tic count at the last tick attributed to this level.
    pub game_tics: i64,
    /// `game_tics` converted to whole seconds at [`TIC_RATE`].
    pub seconds: i64,
    /// Inclusive running sum of `seconds` across summaries so far.
    pub cumulative_seconds: i64,
    /// `seconds` rendered as `MM:SS` / `H:MM:SS`.
    pub hms: String,
    /// `cumulative_seconds` rendered the same way.
    pub cumulative_hms: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
