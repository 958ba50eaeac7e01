mod app;
mod data;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "nodes.csv")]
    nodes: String,

    #[arg(long, default_value = "edges.csv")]
    edges: String,

    /// Node id kept hidden until the first click on the background.
    #[arg(long)]
    reveal: Option<String>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([960.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "orbita",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::RadialApp::new(
                cc,
                data::DataSources {
                    nodes_path: args.nodes.clone(),
                    edges_path: args.edges.clone(),
                },
                args.reveal.clone(),
            )))
        }),
    )
}
