use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use hough_circles::circles::{CircleConfig, detect_circles};
use hough_circles::load::read_pixel_grid;
use hough_circles::overlay::{OUTLINE_RED, draw_circles};

#[derive(Parser, Debug)]
#[command(
    name = "find_circles",
    about = "Detect circles in an image by edge voting",
    version
)]
struct Cli {
    /// Input image
    #[arg(short = 'i', long = "image")]
    image: PathBuf,

    /// JSON file with detection parameters; flags below override it
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Edge threshold, 0 keeps raw magnitudes
    #[arg(short = 't', long = "threshold")]
    threshold: Option<f32>,

    /// Smallest radius to scan
    #[arg(long = "min-radius")]
    min_radius: Option<usize>,

    /// Largest radius to scan (inclusive)
    #[arg(long = "max-radius")]
    max_radius: Option<usize>,

    /// Samples per circle template
    #[arg(long = "samples")]
    samples: Option<usize>,

    /// Score coefficient; candidates need more than coefficient * 255
    #[arg(long = "coefficient")]
    coefficient: Option<f64>,

    /// Suppression distance (Manhattan, pixels)
    #[arg(short = 'd', long = "distance", allow_negative_numbers = true)]
    distance: Option<i64>,

    /// Stop voting after this many milliseconds
    #[arg(long = "budget-ms")]
    budget_ms: Option<u64>,

    /// Print results as JSON
    #[arg(long = "json")]
    json: bool,

    /// Write the source image with red circle outlines to this path
    #[arg(short = 'o', long = "overlay")]
    overlay: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Result<CircleConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => CircleConfig::from_json_file(path)?,
            None => CircleConfig::default(),
        };
        if let Some(v) = self.threshold {
            config.edge_threshold = v;
        }
        if let Some(v) = self.min_radius {
            config.min_radius = v;
        }
        if let Some(v) = self.max_radius {
            config.max_radius = v;
        }
        if let Some(v) = self.samples {
            config.samples = v;
        }
        if let Some(v) = self.coefficient {
            config.score_coefficient = v;
        }
        if let Some(v) = self.distance {
            config.suppression_distance = v;
        }
        if self.budget_ms.is_some() {
            config.time_budget_ms = self.budget_ms;
        }
        Ok(config)
    }
}

fn ensure_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = cli.config()?;

    let pixels = read_pixel_grid(&cli.image)?;
    let detection = detect_circles(&pixels, &config)?;
    let circles = detection.image_triples();

    if detection.truncated() {
        log::warn!(
            "time budget exhausted, {} voting shards skipped; results are partial",
            detection.skipped_shards
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&detection.report())?);
    } else {
        println!("The points we found for circles:");
        for (x, y, r) in &circles {
            println!("x={x}, y={y}, R={r}");
        }
    }

    if let Some(out) = &cli.overlay {
        let source = image::open(&cli.image)?;
        let canvas = draw_circles(&source, &circles, OUTLINE_RED);
        ensure_parent(out)?;
        canvas.save(out)?;
        log::info!("wrote {}", out.display());
    }

    Ok(())
}
