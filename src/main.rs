mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use anyhow::Context;
use app::DashboardApp;
use eframe::egui;
use state::AppState;

/// Default dataset location, as written by `cargo run --bin generate_sample`.
const DEFAULT_DATA_PATH: &str = "data/ResaleData.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut state = AppState::default();
    let default_path = Path::new(DEFAULT_DATA_PATH);
    if default_path.exists() {
        let dataset = data::loader::load_cached(default_path)
            .with_context(|| format!("loading dataset at {DEFAULT_DATA_PATH}"))?;
        log::info!(
            "loaded {} transactions from {DEFAULT_DATA_PATH}",
            dataset.len()
        );
        state.set_dataset(dataset);
    } else {
        log::warn!("no dataset at {DEFAULT_DATA_PATH}; use File → Open");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HDB Resale Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
