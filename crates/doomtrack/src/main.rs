mod bootstrap;

use anyhow::Result;
use clap::Parser;
use track_core::settings::{RenderLayout, Settings};
use track_data::{deriver, export, reader};
use track_render::{compose, plot};

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("doomtrack v{} starting", env!("CARGO_PKG_VERSION"));

    // Stage 1: raw log → cleaned per-tick dataset.
    let ticks = reader::load_and_clean(&settings.data, &settings.clean_options())?;
    tracing::info!(
        "Cleaned {} ticks from {}",
        ticks.len(),
        settings.data.display()
    );

    // Stage 2: cleaned ticks → per-level completion summaries.
    let summaries = deriver::derive_level_summaries(&ticks)?;
    tracing::info!("Derived {} level summaries", summaries.len());

    if let Some(path) = &settings.ticks_csv {
        export::write_ticks_csv(path, &ticks)?;
        tracing::info!("Ticks written to {}", path.display());
    }
    if let Some(path) = &settings.summaries_csv {
        export::write_summaries_csv(path, &summaries)?;
        tracing::info!("Summaries written to {}", path.display());
    }

    // Rendering is optional: without a layout the run is dataset-only.
    if let Some(layout_path) = &settings.layout {
        let layout = RenderLayout::load_from(layout_path)?;

        let markers = deriver::completion_indices(&ticks);
        let timeline = plot::render_timeline(&ticks, &summaries, &markers, layout.length)?;
        let canvas = compose::compose_infographic(&layout, &timeline)?;
        compose::save_png(&layout.output, &canvas)?;

        tracing::info!("Infographic written to {}", layout.output.display());
    }

    Ok(())
}
