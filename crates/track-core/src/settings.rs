use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Session telemetry to infographic pipeline
#[derive(Parser, Debug, Clone)]
#[command(
    name = "doomtrack",
    about = "Clean a recorded session telemetry log and render it as an infographic",
    version
)]
pub struct Settings {
    /// Path to the raw telemetry log (.csv, or .csv.gz for compressed logs)
    #[arg(long)]
    pub data: PathBuf,

    /// Render layout JSON; when absent only the dataset stages run
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Write the cleaned per-tick dataset to this CSV file
    #[arg(long)]
    pub ticks_csv: Option<PathBuf>,

    /// Write the per-level summaries to this CSV file
    #[arg(long)]
    pub summaries_csv: Option<PathBuf>,

    /// Health value forced onto the first cleaned tick
    #[arg(long, default_value_t = 100)]
    pub start_health: i64,

    /// Keep the logged health value at tick zero instead of overriding it
    #[arg(long)]
    pub no_start_health_fix: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}

impl Settings {
    /// Cleaning options implied by the CLI flags.
    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            start_health: if self.no_start_health_fix {
                None
            } else {
                Some(self.start_health)
            },
        }
    }
}

// ── CleanOptions ───────────────────────────────────────────────────────────────

/// Tunables for the log cleaner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    /// When set, the first cleaned tick's `player_health` is overwritten
    /// with this value. The logger reports a garbage health value at tick
    /// zero; 100 corrects that known artifact. Its generality to other
    /// loggers is unverified, so the override stays configurable.
    pub start_health: Option<i64>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            start_health: Some(100),
        }
    }
}

// ── RenderLayout ───────────────────────────────────────────────────────────────

/// Everything the renderer needs to compose the final infographic, loaded
/// from a JSON file. An explicit value passed down the call chain; the
/// renderer keeps no process-wide figure state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderLayout {
    /// Header image (PNG) pasted at the top of the canvas.
    pub header: PathBuf,
    /// Labels image (PNG) introducing the plot rows.
    pub labels: PathBuf,
    /// Output path for the composed infographic PNG.
    pub output: PathBuf,
    /// Caption lines drawn under the header.
    #[serde(default)]
    pub info_lines: Vec<String>,
    /// Credit lines drawn at the bottom of the canvas.
    #[serde(default)]
    pub footer_lines: Vec<String>,
    /// Length multiplier for the data portion of the plot.
    #[serde(default = "default_length")]
    pub length: u32,
    /// Pixel width of the rendered text blocks.
    #[serde(default = "default_text_width")]
    pub text_width: u32,
    /// Font size of the caption block.
    #[serde(default = "default_info_size")]
    pub info_size: u32,
    /// Font size of the footer block.
    #[serde(default = "default_footer_size")]
    pub footer_size: u32,
}

fn default_length() -> u32 {
    35
}

fn default_text_width() -> u32 {
    905
}

fn default_info_size() -> u32 {
    18
}

fn default_footer_size() -> u32 {
    14
}

impl RenderLayout {
    /// Load a layout from a JSON file.
    ///
    /// Unlike persisted preferences, a broken layout file is an error: a
    /// half-specified infographic is not worth emitting.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Settings ─────────────────────────────────────────────────────────────

    #[test]
    fn test_settings_minimal_invocation() {
        let settings =
            Settings::try_parse_from(["doomtrack", "--data", "session.csv"]).unwrap();
        assert_eq!(settings.data, PathBuf::from("session.csv"));
        assert!(settings.layout.is_none());
        assert_eq!(settings.start_health, 100);
        assert!(!settings.no_start_health_fix);
        assert_eq!(settings.log_level, "INFO");
    }

    #[test]
    fn test_settings_requires_data() {
        assert!(Settings::try_parse_from(["doomtrack"]).is_err());
    }

    #[test]
    fn test_settings_rejects_unknown_log_level() {
        let result = Settings::try_parse_from([
            "doomtrack",
            "--data",
            "session.csv",
            "--log-level",
            "VERBOSE",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_clean_options_default_forces_health() {
        let settings =
            Settings::try_parse_from(["doomtrack", "--data", "session.csv"]).unwrap();
        assert_eq!(settings.clean_options().start_health, Some(100));
    }

    #[test]
    fn test_clean_options_custom_start_health() {
        let settings = Settings::try_parse_from([
            "doomtrack",
            "--data",
            "session.csv",
            "--start-health",
            "200",
        ])
        .unwrap();
        assert_eq!(settings.clean_options().start_health, Some(200));
    }

    #[test]
    fn test_clean_options_fix_disabled() {
        let settings = Settings::try_parse_from([
            "doomtrack",
            "--data",
            "session.csv",
            "--no-start-health-fix",
        ])
        .unwrap();
        assert_eq!(settings.clean_options().start_health, None);
    }

    // ── RenderLayout ─────────────────────────────────────────────────────────

    #[test]
    fn test_layout_load_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "header": "images/header.png",
                "labels": "images/labels.png",
                "output": "out.png",
                "info_lines": ["RUN IN 1:29:48", "MAPS 01 - 32"]
            }}"#
        )
        .unwrap();

        let layout = RenderLayout::load_from(&path).unwrap();
        assert_eq!(layout.header, PathBuf::from("images/header.png"));
        assert_eq!(layout.info_lines.len(), 2);
        assert!(layout.footer_lines.is_empty());
        assert_eq!(layout.length, 35);
        assert_eq!(layout.text_width, 905);
        assert_eq!(layout.info_size, 18);
        assert_eq!(layout.footer_size, 14);
    }

    #[test]
    fn test_layout_load_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = RenderLayout::load_from(&dir.path().join("absent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_layout_load_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "{not json").unwrap();
        let result = RenderLayout::load_from(&path);
        assert!(result.is_err());
    }
}
