//! The stacked telemetry timeline.
//!
//! Reproduces the session figure: four ammo bands, five power strips, a
//! symmetric health/armor band, and white completion markers labelled with
//! each level's time, all drawn over the tick index axis.

use image::RgbImage;
use plotters::prelude::*;
use plotters::style::FontTransform;
use tracing::debug;
use track_core::error::{Result, TrackError};
use track_core::formatting::map_label;
use track_core::models::{LevelSummary, Tick};

/// Pixels per length unit of the data portion.
const UNIT_WIDTH: u32 = 72;

/// Height of the whole figure before rotation.
const PLOT_HEIGHT: u32 = 360;

/// The figure is divided into 24 rows: four 3-row ammo bands, five 1-row
/// power strips and a 7-row health band.
const GRID_ROWS: u32 = 24;

/// Index margin appended after the last tick, so the final marker label
/// stays inside the canvas.
const TAIL_MARGIN: usize = 20;

const AMMO_FILL: RGBColor = RGBColor(255, 140, 0);
const POWER_FILL: RGBColor = RGBColor(46, 139, 87);
const HEALTH_FILL: RGBColor = RGBColor(178, 34, 34);
const ARMOR_FILL: RGBColor = RGBColor(46, 139, 87);

/// Background shades darkening down the ammo bands.
const AMMO_BACKGROUNDS: [RGBColor; 4] = [
    RGBColor(0x2D, 0x0E, 0x01),
    RGBColor(0x44, 0x14, 0x01),
    RGBColor(0x5A, 0x1B, 0x01),
    RGBColor(0x71, 0x22, 0x01),
];

/// Background shades darkening down the power strips.
const POWER_BACKGROUNDS: [RGBColor; 5] = [
    RGBColor(0x17, 0x2A, 0x47),
    RGBColor(0x15, 0x27, 0x41),
    RGBColor(0x13, 0x23, 0x3B),
    RGBColor(0x11, 0x1F, 0x34),
    RGBColor(0x0F, 0x1B, 0x2E),
];

const AMMO_FIELDS: [fn(&Tick) -> i64; 4] = [
    |t| t.ammo_cell,
    |t| t.ammo_rocket,
    |t| t.ammo_shell,
    |t| t.ammo_bullet,
];

const POWER_FIELDS: [fn(&Tick) -> i64; 5] = [
    |t| t.power_berserk,
    |t| t.power_invulnerability,
    |t| t.power_invisibility,
    |t| t.power_light,
    |t| t.power_ironfeet,
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Draw the timeline figure into an in-memory RGB image.
///
/// `markers` are the tick indices of each level's completion, in the same
/// order as `summaries` (see `track_data::deriver::completion_indices`).
/// `length` is the layout's width multiplier for the data portion.
pub fn render_timeline(
    ticks: &[Tick],
    summaries: &[LevelSummary],
    markers: &[usize],
    length: u32,
) -> Result<RgbImage> {
    let width = length.max(1) * UNIT_WIDTH;
    let height = PLOT_HEIGHT;
    let x_span = (ticks.len().saturating_sub(1) + TAIL_MARGIN) as f64;

    let mut buf = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        root.fill(&BLACK).map_err(render_err)?;

        let bands = split_rows(&root, &band_breakpoints(height));

        // Ammo bands (rows 0..12, three rows each).
        for (i, field) in AMMO_FIELDS.iter().enumerate() {
            draw_value_band(
                &bands[i],
                ticks,
                x_span,
                *field,
                AMMO_FILL,
                AMMO_BACKGROUNDS[i],
            )?;
        }

        // Power strips (rows 12..17, one row each): on/off only.
        for (i, field) in POWER_FIELDS.iter().enumerate() {
            draw_power_band(
                &bands[4 + i],
                ticks,
                x_span,
                *field,
                POWER_FILL,
                POWER_BACKGROUNDS[i],
            )?;
        }

        // Health + armor, stacked symmetrically around zero (rows 17..24).
        draw_health_band(&bands[9], ticks, x_span)?;

        draw_markers(&root, summaries, markers, x_span, width, height)?;

        root.present().map_err(render_err)?;
    }

    debug!("Rendered {}x{} timeline plot", width, height);
    RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| TrackError::Render("plot buffer size mismatch".to_string()))
}

/// Vertical pixel breakpoints of the 10 bands within `height`.
pub fn band_breakpoints(height: u32) -> Vec<u32> {
    // Row spans: 3,3,3,3 (ammo), 1,1,1,1,1 (powers); the health band takes
    // the remaining 7 rows.
    [3u32, 6, 9, 12, 13, 14, 15, 16, 17]
        .iter()
        .map(|rows| rows * height / GRID_ROWS)
        .collect()
}

// ── Band drawing ──────────────────────────────────────────────────────────────

type Band<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn render_err<E: std::fmt::Display>(e: E) -> TrackError {
    TrackError::Render(e.to_string())
}

/// Split `area` into horizontal strips at the given y pixel offsets.
fn split_rows<'a>(area: &Band<'a>, breaks: &[u32]) -> Vec<Band<'a>> {
    let mut out = Vec::with_capacity(breaks.len() + 1);
    let mut rest = area.clone();
    let mut offset = 0;
    for &b in breaks {
        let (top, bottom) = rest.split_vertically((b - offset) as i32);
        out.push(top);
        rest = bottom;
        offset = b;
    }
    out.push(rest);
    out
}

/// Filled area of one ammo counter over the tick index.
fn draw_value_band(
    band: &Band<'_>,
    ticks: &[Tick],
    x_span: f64,
    field: fn(&Tick) -> i64,
    fill: RGBColor,
    background: RGBColor,
) -> Result<()> {
    band.fill(&background).map_err(render_err)?;

    let y_max = ticks.iter().map(field).max().unwrap_or(0).max(1) as f64 * 1.1;
    let mut chart = ChartBuilder::on(band)
        .build_cartesian_2d(0.0..x_span, 0.0..y_max)
        .map_err(render_err)?;

    let points = ticks
        .iter()
        .enumerate()
        .map(|(i, t)| (i as f64, field(t) as f64));
    chart
        .draw_series(AreaSeries::new(points, 0.0, fill.filled()))
        .map_err(render_err)?;
    Ok(())
}

/// On/off strip of one power-up flag.
fn draw_power_band(
    band: &Band<'_>,
    ticks: &[Tick],
    x_span: f64,
    field: fn(&Tick) -> i64,
    fill: RGBColor,
    background: RGBColor,
) -> Result<()> {
    band.fill(&background).map_err(render_err)?;

    let mut chart = ChartBuilder::on(band)
        .build_cartesian_2d(0.0..x_span, 0.0..1.0)
        .map_err(render_err)?;

    let points = ticks
        .iter()
        .enumerate()
        .map(|(i, t)| (i as f64, if field(t) != 0 { 1.0 } else { 0.0 }));
    chart
        .draw_series(AreaSeries::new(points, 0.0, fill.filled()))
        .map_err(render_err)?;
    Ok(())
}

/// Health and armor stacked symmetrically around the band's midline.
fn draw_health_band(band: &Band<'_>, ticks: &[Tick], x_span: f64) -> Result<()> {
    band.fill(&BLACK).map_err(render_err)?;

    let y_max = ticks
        .iter()
        .map(|t| t.player_health + t.player_armor)
        .max()
        .unwrap_or(0)
        .max(1) as f64;
    let half = y_max / 2.0;

    let mut chart = ChartBuilder::on(band)
        .build_cartesian_2d(0.0..x_span, -half..half)
        .map_err(render_err)?;

    // Bottom edge of the stack at each tick, then health on top of it,
    // then armor on top of health.
    let bottom: Vec<(f64, f64)> = ticks
        .iter()
        .enumerate()
        .map(|(i, t)| (i as f64, -(t.player_health + t.player_armor) as f64 / 2.0))
        .collect();
    let mid: Vec<(f64, f64)> = ticks
        .iter()
        .enumerate()
        .map(|(i, t)| (i as f64, bottom[i].1 + t.player_health as f64))
        .collect();
    let top: Vec<(f64, f64)> = ticks
        .iter()
        .enumerate()
        .map(|(i, t)| (i as f64, mid[i].1 + t.player_armor as f64))
        .collect();

    chart
        .draw_series(std::iter::once(band_polygon(&bottom, &mid, HEALTH_FILL)))
        .map_err(render_err)?;
    chart
        .draw_series(std::iter::once(band_polygon(&mid, &top, ARMOR_FILL)))
        .map_err(render_err)?;
    Ok(())
}

/// Closed polygon between a lower and an upper edge.
fn band_polygon(
    lower: &[(f64, f64)],
    upper: &[(f64, f64)],
    fill: RGBColor,
) -> Polygon<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = upper.to_vec();
    points.extend(lower.iter().rev().copied());
    Polygon::new(points, fill.filled())
}

/// White completion lines across the whole figure, labelled `M{map} {hms}`.
fn draw_markers(
    root: &Band<'_>,
    summaries: &[LevelSummary],
    markers: &[usize],
    x_span: f64,
    width: u32,
    height: u32,
) -> Result<()> {
    let style = ("monospace", 13)
        .into_font()
        .color(&WHITE)
        .transform(FontTransform::Rotate90);

    for (summary, &index) in summaries.iter().zip(markers) {
        let x = ((index as f64 / x_span) * width as f64) as i32;
        root.draw(&PathElement::new(
            vec![(x, 0), (x, height as i32)],
            WHITE.stroke_width(1),
        ))
        .map_err(render_err)?;

        let label = map_label(summary.level_map_number, &summary.hms);
        root.draw(&Text::new(label, (x + 4, 4), style.clone()))
            .map_err(render_err)?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_breakpoints_are_increasing() {
        let breaks = band_breakpoints(PLOT_HEIGHT);
        assert_eq!(breaks.len(), 9);
        for pair in breaks.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(*breaks.last().unwrap() < PLOT_HEIGHT);
    }

    #[test]
    fn test_band_breakpoints_ammo_band_heights() {
        // Each ammo band spans three of the 24 grid rows.
        let breaks = band_breakpoints(240);
        assert_eq!(breaks[0], 30);
        assert_eq!(breaks[1], 60);
        assert_eq!(breaks[3], 120);
        // Power strips are one row each.
        assert_eq!(breaks[4] - breaks[3], 10);
    }
}
