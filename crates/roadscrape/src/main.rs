mod extract;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Convert a directory of TIGERweb road-table HTML exports to CSV
#[derive(Parser, Debug, Clone)]
#[command(
    name = "roadscrape",
    about = "Convert TIGERweb road-table HTML exports to CSV, one output per input",
    version
)]
struct Args {
    /// Directory containing the .html exports; a same-named .csv is written
    /// next to each one
    #[arg(short, long)]
    directory: PathBuf,

    /// Worker threads (defaults to one per CPU core)
    #[arg(short, long)]
    processes: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    if let Some(n) = args.processes {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("building worker pool")?;
    }

    let files = find_html_files(&args.directory);
    if files.is_empty() {
        warn!("No .html files found in {}", args.directory.display());
        return Ok(());
    }

    info!(
        "Converting {} files from {}",
        files.len(),
        args.directory.display()
    );

    // One output per input, no cross-file state: failures are reported and
    // the rest of the batch keeps going.
    let converted: usize = files
        .par_iter()
        .map(|path| match convert_file(path) {
            Ok(rows) => {
                info!("{}: {} rows", path.display(), rows);
                1
            }
            Err(e) => {
                error!("{}: {:#}", path.display(), e);
                0
            }
        })
        .sum();

    info!("Converted {}/{} files", converted, files.len());
    Ok(())
}

/// All `.html` files directly inside `dir`, sorted by path.
fn find_html_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("html"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Extract one file's road table and write the sibling CSV. Returns the
/// number of data rows written.
fn convert_file(path: &Path) -> Result<usize> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let rows = extract::road_table_rows(&html)?;
    let out = path.with_extension("csv");
    extract::write_road_csv(&out, &rows)?;
    Ok(rows.len())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    const SAMPLE: &str = "<table>\
        <tr><td>MTFCC</td><td>OID</td></tr>\
        <tr><td>S1100</td><td>21065</td></tr>\
        </table>";

    // ── find_html_files ───────────────────────────────────────────────────────

    #[test]
    fn test_find_html_files_sorted_non_recursive() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "b.html", SAMPLE);
        write_file(dir.path(), "a.html", SAMPLE);
        write_file(dir.path(), "notes.txt", "skip me");
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        write_file(&sub, "deep.html", SAMPLE);

        let files = find_html_files(dir.path());
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.html", "b.html"]);
    }

    #[test]
    fn test_find_html_files_missing_dir() {
        assert!(find_html_files(Path::new("/tmp/roadscrape-missing-dir-xyz")).is_empty());
    }

    // ── convert_file ──────────────────────────────────────────────────────────

    #[test]
    fn test_convert_file_writes_sibling_csv() {
        let dir = TempDir::new().unwrap();
        let html = write_file(dir.path(), "pri.html", SAMPLE);

        let rows = convert_file(&html).unwrap();
        assert_eq!(rows, 1);

        let csv_path = dir.path().join("pri.csv");
        let content = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("MTFCC,OID,RTTYP"));
        assert_eq!(lines.next().unwrap(), "S1100,21065");
    }

    #[test]
    fn test_convert_file_without_marker_fails() {
        let dir = TempDir::new().unwrap();
        let html = write_file(dir.path(), "empty.html", "<table></table>");
        assert!(convert_file(&html).is_err());
    }
}
