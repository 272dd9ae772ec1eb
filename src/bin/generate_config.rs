//! Generate the default configuration file
//!
//! Creates a JSON config with all default parameters

use std::{env, path::Path, process};
use urine_colorscan::AppConfig;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} config/urine_colorscan.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = AppConfig::default();

    match config.to_json_file(output_path) {
        Ok(_) => {
            let analysis = &config.analysis;
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!("  Listen:     {}", config.server.bind_addr);
            eprintln!("  Uploads:    {}", config.storage.upload_dir.display());
            eprintln!(
                "  Color:      {}px window, resize to {}",
                analysis.color.window_size,
                analysis.color.resize_to.map_or("none".to_string(), |s| format!("{}px", s))
            );
            eprintln!(
                "  Nitrite:    {}px window, default mode {}",
                analysis.nitrite.window_size, analysis.nitrite.default_mode
            );
            eprintln!(
                "  Calibration: yellow ({}, {}), white ({}, {})",
                analysis.nitrite.yellow.baseline,
                analysis.nitrite.yellow.scale,
                analysis.nitrite.white.baseline,
                analysis.nitrite.white.scale
            );
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
