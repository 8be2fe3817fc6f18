mod app;
mod ui;

use std::path::PathBuf;

use app::PokedexApp;
use eframe::egui;
use pokedex_viz::{AppState, ViewerConfig};

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::discover().unwrap_or_else(|e| {
        log::error!("Ignoring config: {e:#}");
        ViewerConfig::default()
    });

    let mut state = AppState::new(config.clone());
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        ui::panels::load_into(&mut state, &path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pokédex Viz – Stat Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(PokedexApp::new(state)))),
    )
}
