mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::TrendLensApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

/// Desktop dashboard for the retail analytics engine.
#[derive(Parser, Debug)]
#[command(name = "trendlens", version, about)]
struct Args {
    /// Dataset to open on startup (.csv, .json or .parquet).
    #[arg(short, long, env = "TRENDLENS_DATA")]
    data: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let mut state = AppState::default();
    if let Some(path) = args.data {
        ui::panels::load_path(&mut state, path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TrendLens Analytics Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(TrendLensApp::new(state)))),
    )
}
