mod app;
mod data;
mod smooth;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::SmoothScopeApp;
use eframe::egui;

const DEFAULT_DATASET: &str = "data/noisy_sine_timeseries.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Dataset load is the only startup I/O; failure aborts the process.
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));
    let signal = data::loader::load_file(&path)
        .with_context(|| format!("loading dataset {}", path.display()))?;
    log::info!("Loaded {} points from {}", signal.len(), path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SmoothScope – Smoothing Methods Comparison",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(SmoothScopeApp::new(signal)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
