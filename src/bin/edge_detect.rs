use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use hough_circles::circles::{detect_edges, to_grayscale};
use hough_circles::load::read_pixel_grid;
use hough_circles::overlay::edge_map_image;

/// Write the finite-difference edge map of an image as a grayscale PNG
#[derive(Parser, Debug)]
#[command(name = "edge_detect", version)]
struct Cli {
    /// Input image
    #[arg(short = 'i', long = "image")]
    image: PathBuf,

    /// Edge threshold, 0 keeps raw magnitudes
    #[arg(short = 't', long = "threshold", default_value_t = 35.0)]
    threshold: f32,

    /// Output PNG
    #[arg(short = 'o', long = "out", default_value = "edges.png")]
    out: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let pixels = read_pixel_grid(&cli.image)?;
    let gray = to_grayscale(&pixels);
    let edges = detect_edges(&gray, cli.threshold)?;
    edge_map_image(&edges)?.save(&cli.out)?;

    println!(
        "wrote {} ({}x{})",
        cli.out.display(),
        edges.width(),
        edges.height()
    );
    Ok(())
}
