//! Command-line interface for urine_colorscan
//!
//! Analyzes a single image file and prints the result as JSON

use std::{env, path::Path, process};
use urine_colorscan::{analyze_image, AppConfig, Language, NitriteMode, UrineAnalysis};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut mode_arg = None;
    let mut config_arg = None;
    let mut language = Language::English;
    let mut image_path_arg = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" | "--config" if i + 1 >= args.len() => {
                eprintln!("Error: {} requires a value", args[i]);
                process::exit(1);
            }
            "--mode" => {
                mode_arg = Some(args[i + 1].clone());
                i += 1;
            }
            "--config" => {
                config_arg = Some(args[i + 1].clone());
                i += 1;
            }
            "--thai" => language = Language::Thai,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let image_path_str = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    let config = match config_arg {
        Some(path) => AppConfig::from_json_file(Path::new(&path)).unwrap_or_else(|error| {
            eprintln!("Error: {}", error);
            process::exit(1);
        }),
        None => AppConfig::default(),
    };

    let mode = match mode_arg {
        Some(mode) => mode.parse::<NitriteMode>().unwrap_or_else(|error| {
            eprintln!("Error: {}", error);
            process::exit(1);
        }),
        None => config.analysis.nitrite.default_mode,
    };

    let image_path = Path::new(&image_path_str);
    if !image_path.exists() {
        eprintln!("Error: File '{}' does not exist", image_path.display());
        process::exit(1);
    }

    match analyze_image(image_path, &config.analysis, mode) {
        Ok(result) => print_result(&result, language),
        Err(error) => {
            eprintln!("Analysis failed: {}", error);
            if error.is_recoverable() {
                eprintln!("Suggestion: {}", error.user_message());
            }
            process::exit(1);
        }
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Classify urine color and estimate nitrite from a photo.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --mode yellow|white   Reference background for the nitrite estimate");
    eprintln!("  --config FILE         Load analysis settings from a JSON config");
    eprintln!("  --thai                Print the summary in Thai");
    eprintln!("  --help, -h            Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} sample.jpg", program_name);
    eprintln!("  {} --mode white sample.png", program_name);
}

fn print_result(result: &UrineAnalysis, language: Language) {
    // JSON on stdout for programmatic use
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }

    // Summary on stderr for human reading
    let color = &result.color;
    eprintln!();
    eprintln!("Urine Analysis Summary:");
    eprintln!("  Image: {}x{}", result.width, result.height);
    eprintln!(
        "  Color: {} ({})",
        color.label.label(language),
        color.label.advice(language)
    );
    eprintln!(
        "  Mean RGB: ({:.1}, {:.1}, {:.1}) {}",
        color.mean.red, color.mean.green, color.mean.blue, color.hex
    );
    eprintln!(
        "  Nitrite: {:.3} mg/mL ({} background, green mean {:.1})",
        result.nitrite.mg_per_ml, result.nitrite.mode, result.nitrite.green_mean
    );
    eprintln!("  Note: the nitrite value is a linear approximation, not a measurement.");
}
