use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cardscan::models::{MAX_REGION_AREA, MIN_REGION_AREA};
use cardscan::scan::draw_candidate;
use cardscan::{RegionDetector, ToneParams};

#[derive(Parser)]
#[command(name = "cardscan")]
#[command(about = "Detect a document/card region in an image and enhance the crop")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Minimum accepted contour area in pixel units
    #[arg(long, default_value_t = MIN_REGION_AREA)]
    min_area: f64,

    /// Maximum accepted contour area in pixel units
    #[arg(long, default_value_t = MAX_REGION_AREA)]
    max_area: f64,

    /// Brightness adjustment in [-255, 255]
    #[arg(long, default_value_t = 30)]
    brightness: i32,

    /// Contrast adjustment in [-255, 255]
    #[arg(long, default_value_t = 30)]
    contrast: i32,

    /// Save the input frame with the detected region outlined
    #[arg(long, value_name = "PATH")]
    annotated_out: Option<PathBuf>,

    /// Save the tone-mapped crop of the detected region
    #[arg(long, value_name = "PATH")]
    enhanced_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    let frame = img.to_rgba8();

    let detector = RegionDetector::new().with_area_range(args.min_area, args.max_area);

    let Some(candidate) = detector.detect(&frame) else {
        println!("No document region detected.");
        return Ok(());
    };

    let rect = candidate.rectangle;
    println!(
        "Detected region: ({}, {}) to ({}, {}) - area {:.0}",
        rect.top_left.x, rect.top_left.y, rect.bottom_right.x, rect.bottom_right.y, candidate.area
    );

    if let Some(path) = &args.annotated_out {
        let mut annotated = frame.clone();
        draw_candidate(&mut annotated, &candidate);
        annotated.save(path)?;
        println!("Annotated frame saved to {}", path.display());
    }

    if let Some(path) = &args.enhanced_out {
        let crop = image::imageops::crop_imm(
            &frame,
            rect.top_left.x,
            rect.top_left.y,
            rect.width().min(frame.width() - rect.top_left.x),
            rect.height().min(frame.height() - rect.top_left.y),
        )
        .to_image();

        let params = ToneParams::new(args.brightness, args.contrast);
        let enhanced = cardscan::tone::enhance(&crop, params);
        enhanced.save(path)?;
        println!("Enhanced crop saved to {}", path.display());
    }

    Ok(())
}
