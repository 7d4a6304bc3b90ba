//! Final infographic assembly.
//!
//! Stacks the header image, caption block, labels image, rotated plot and
//! footer block top-to-bottom onto one black canvas and writes the result
//! as a PNG.

use std::path::Path;

use image::{imageops, Rgb, RgbImage};
use plotters::prelude::*;
use tracing::debug;
use track_core::error::{Result, TrackError};
use track_core::settings::RenderLayout;

const BLACK_PIXEL: Rgb<u8> = Rgb([0, 0, 0]);

/// Left inset of rendered text, in pixels.
const TEXT_MARGIN: i32 = 5;

/// Black padding below each text block.
const BLOCK_PADDING: u32 = 10;

/// Black border to the left of the rotated plot.
const PLOT_BORDER: u32 = 5;

// ── Public API ────────────────────────────────────────────────────────────────

/// Compose the full infographic canvas from the layout's assets and the
/// rendered timeline plot.
pub fn compose_infographic(layout: &RenderLayout, plot: &RgbImage) -> Result<RgbImage> {
    let header = load_png(&layout.header)?;
    let info = text_block(&layout.info_lines, layout.text_width, layout.info_size)?;
    let labels = load_png(&layout.labels)?;
    let figure = prepare_plot(plot);
    let footer = text_block(&layout.footer_lines, layout.text_width, layout.footer_size)?;

    let canvas = stack_images(&[header, info, labels, figure, footer]);
    debug!(
        "Composed {}x{} infographic canvas",
        canvas.width(),
        canvas.height()
    );
    Ok(canvas)
}

/// Write the composed canvas as a PNG.
pub fn save_png(path: &Path, canvas: &RgbImage) -> Result<()> {
    canvas
        .save(path)
        .map_err(|e| TrackError::Render(format!("{}: {}", path.display(), e)))
}

/// Render a list of lines as white monospace text on a black block.
///
/// The block is `width` pixels wide, one line of `font_size` worth of
/// height per entry plus bottom padding; an empty list yields a bare
/// padding strip.
pub fn text_block(lines: &[String], width: u32, font_size: u32) -> Result<RgbImage> {
    let line_height = font_size + font_size / 3;
    let height = lines.len() as u32 * line_height + BLOCK_PADDING;

    let mut buf = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        root.fill(&BLACK).map_err(render_err)?;

        let style = ("monospace", font_size as i32).into_font().color(&WHITE);
        for (i, line) in lines.iter().enumerate() {
            root.draw(&Text::new(
                line.as_str(),
                (TEXT_MARGIN, (i as u32 * line_height) as i32),
                style.clone(),
            ))
            .map_err(render_err)?;
        }
        root.present().map_err(render_err)?;
    }

    RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| TrackError::Render("text block buffer size mismatch".to_string()))
}

/// Rotate the plot a quarter turn for the vertical canvas and give it a
/// black left border.
pub fn prepare_plot(plot: &RgbImage) -> RgbImage {
    let rotated = imageops::rotate270(plot);
    let mut framed = RgbImage::from_pixel(
        rotated.width() + PLOT_BORDER,
        rotated.height(),
        BLACK_PIXEL,
    );
    imageops::replace(&mut framed, &rotated, PLOT_BORDER as i64, 0);
    framed
}

/// Stack images top-to-bottom on a black canvas as wide as the widest
/// member.
pub fn stack_images(images: &[RgbImage]) -> RgbImage {
    let width = images.iter().map(|i| i.width()).max().unwrap_or(1);
    let height: u32 = images.iter().map(|i| i.height()).sum::<u32>().max(1);

    let mut canvas = RgbImage::from_pixel(width, height, BLACK_PIXEL);
    let mut y: i64 = 0;
    for img in images {
        imageops::replace(&mut canvas, img, 0, y);
        y += img.height() as i64;
    }
    canvas
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn render_err<E: std::fmt::Display>(e: E) -> TrackError {
    TrackError::Render(e.to_string())
}

fn load_png(path: &Path) -> Result<RgbImage> {
    let img = image::open(path)
        .map_err(|e| TrackError::Render(format!("{}: {}", path.display(), e)))?;
    Ok(img.to_rgb8())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
