#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod scene;
mod views;

use std::path::PathBuf;

use aero_app::{ClientConfig, load_config};
use app::AeroSprintApp;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional first argument: path to a client configuration file.
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_config(&path).unwrap_or_else(|e| {
            error!(path = %path.display(), error = %e, "falling back to default configuration");
            ClientConfig::default()
        }),
        None => ClientConfig::default(),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to start async runtime");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("AeroSprint"),
        ..Default::default()
    };

    eframe::run_native(
        "AeroSprint",
        options,
        Box::new(|cc| Ok(Box::new(AeroSprintApp::new(cc, runtime, config)))),
    )
}
