mod app;
mod paper;
mod util;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with the paper collection.
    #[arg(long, default_value = "papers.json")]
    papers: PathBuf,

    /// Number of papers kept for the graph.
    #[arg(long, default_value_t = 200)]
    graph_size: usize,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "paper-orbit",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::PaperOrbitApp::new(
                cc,
                args.papers.clone(),
                args.graph_size,
            )))
        }),
    )
}
