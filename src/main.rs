mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::RankingsExplorerApp;
use eframe::egui;
use rankings_explorer::config::Settings;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::discover().unwrap_or_else(|e| {
        log::warn!("{e}; falling back to default settings");
        Settings::default()
    });

    // A dataset path on the command line wins over the configured one.
    let data_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.data.path.clone());

    let mut state = AppState::new(settings);
    if let Some(path) = data_path {
        state.load_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rankings Explorer – University Rankings Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(RankingsExplorerApp::new(state)))),
    )
}
