mod analyser;
mod app;
mod player;
mod tap;
mod ui;

use eframe::egui;
use particle_field::VisualizerConfig;

use crate::app::ParticleFieldApp;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => VisualizerConfig::load(&path).unwrap_or_else(|err| {
            log::error!("could not load config {path}: {err}; using defaults");
            VisualizerConfig::default()
        }),
        None => VisualizerConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Music Visualizer")
            .with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };
    if let Err(err) = eframe::run_native(
        "Music Visualizer",
        options,
        Box::new(|cc| Ok(Box::new(ParticleFieldApp::new(cc, config)))),
    ) {
        log::error!("failed to start native app: {err}");
    }
}
