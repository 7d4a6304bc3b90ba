//! Road-table extraction from TIGERweb HTML exports.
//!
//! The source pages carry one data table whose header row starts with an
//! `MTFCC` cell; that cell is the structural marker used to find the table.
//! Parsing is plain case-insensitive tag slicing; the pages are
//! machine-generated and regular enough that a full HTML parser buys
//! nothing.

use std::path::Path;

use anyhow::{bail, Result};
use tracing::debug;

/// Output schema of every generated CSV.
pub const ROAD_HEADER: [&str; 17] = [
    "MTFCC",
    "OID",
    "RTTYP",
    "PREDIR",
    "PREDIRABRV",
    "PREQUAL",
    "PREQUALABRV",
    "PRETYP",
    "PRETYPEABRV",
    "SUFDIR",
    "SUFDIRABRV",
    "SUFQUAL",
    "SUFQUALABRV",
    "SUFTYP",
    "SUFTYPEABRV",
    "BASENAME",
    "NAME",
];

/// Marker cell text identifying the data table.
const MARKER: &str = "MTFCC";

// ── Public API ────────────────────────────────────────────────────────────────

/// Extract the data rows of the MTFCC-marked table.
///
/// Returns one `Vec<String>` of tag-stripped cell texts per table row, with
/// the header row skipped. Fails when the document has no marker cell or no
/// enclosing table.
pub fn road_table_rows(html: &str) -> Result<Vec<Vec<String>>> {
    let table = marked_table(html)?;

    let mut rows = Vec::new();
    let mut pos = 0;
    let mut first = true;
    while let Some((start, end)) = next_tag_block(table, "<tr", "</tr>", pos) {
        pos = end;
        if first {
            // The first row repeats the column names.
            first = false;
            continue;
        }
        rows.push(row_cells(&table[start..end]));
    }

    debug!("Extracted {} data rows", rows.len());
    Ok(rows)
}

/// Write extracted rows under the fixed 17-column header.
pub fn write_road_csv(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(ROAD_HEADER)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// The `<table>` block enclosing the marker cell.
fn marked_table(html: &str) -> Result<&str> {
    let lc = to_lower(html);
    let Some(marker) = lc.find(&to_lower(MARKER)) else {
        bail!("no {MARKER} marker cell found");
    };

    let Some(open) = lc[..marker].rfind("<table") else {
        bail!("{MARKER} marker is not inside a table");
    };
    let Some(close_rel) = lc[marker..].find("</table>") else {
        bail!("table containing {MARKER} is not closed");
    };

    Ok(&html[open..marker + close_rel])
}

/// Cell texts of one `<tr>` block.
fn row_cells(tr: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut pos = 0;
    while let Some((start, end)) = next_tag_block(tr, "<td", "</td>", pos) {
        cells.push(strip_tags(&tr[start..end]));
        pos = end;
    }
    cells
}

/// Find the next `open ... close` tag block at or after `from`.
///
/// Returns the byte range from the start of the open tag to the end of the
/// close tag. Matching is ASCII case-insensitive.
fn next_tag_block(s: &str, open: &str, close: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let start = lc.get(from..)?.find(&to_lower(open))? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let close_rel = lc[open_end..].find(&to_lower(close))?;
    let end = open_end + close_rel + close.len();
    Some((start, end))
}

/// Drop every tag and collapse the remaining whitespace.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
        <html><body>
        <p>TIGERweb road export</p>
        <table border="1">
          <tr><td>MTFCC</td><td>OID</td><td>RTTYP</td></tr>
          <TR><TD>S1100</TD><TD>21065</TD><TD>I</TD></TR>
          <tr><td>S1200</td><td><b>21066</b></td><td>U</td></tr>
        </table>
        </body></html>
    "#;

    // ── road_table_rows ───────────────────────────────────────────────────────

    #[test]
    fn test_rows_extracted_under_marker() {
        let rows = road_table_rows(SAMPLE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["S1100", "21065", "I"]);
    }

    #[test]
    fn test_header_row_is_skipped() {
        let rows = road_table_rows(SAMPLE).unwrap();
        assert!(rows.iter().all(|r| r[0] != "MTFCC"));
    }

    #[test]
    fn test_nested_tags_are_stripped() {
        let rows = road_table_rows(SAMPLE).unwrap();
        assert_eq!(rows[1][1], "21066");
    }

    #[test]
    fn test_mixed_case_tags_are_matched() {
        // The second data row uses uppercase TR/TD tags.
        let rows = road_table_rows(SAMPLE).unwrap();
        assert_eq!(rows[0][2], "I");
    }

    #[test]
    fn test_missing_marker_is_an_error() {
        let err = road_table_rows("<table><tr><td>nope</td></tr></table>").unwrap_err();
        assert!(err.to_string().contains("MTFCC"));
    }

    #[test]
    fn test_marker_outside_table_is_an_error() {
        assert!(road_table_rows("<p>MTFCC</p>").is_err());
    }

    // ── write_road_csv ────────────────────────────────────────────────────────

    #[test]
    fn test_csv_has_fixed_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roads.csv");
        let rows = vec![vec!["S1100".to_string(), "21065".to_string()]];

        write_road_csv(&path, &rows).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .unwrap();
        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 17);
        assert_eq!(&records[0][0], "MTFCC");
        assert_eq!(&records[1][0], "S1100");
    }
}
