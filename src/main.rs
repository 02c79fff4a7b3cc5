mod app;
mod config;
mod data;
mod state;
mod topic;
mod ui;

use app::RegionDashboardApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!("Data directory: {}", config.data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Региональная аналитика",
        options,
        Box::new(move |cc| Ok(Box::new(RegionDashboardApp::new(cc, config)))),
    )
}
