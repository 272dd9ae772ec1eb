//! urine_colorscan web server
//!
//! Serves the upload form, analyzes submitted photos and stores them in the
//! configured upload directory.

use std::{env, path::Path, process};
use tracing_subscriber::EnvFilter;
use urine_colorscan::{server, AppConfig};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut bind_addr = None;
    let mut upload_dir = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "--bind" | "--upload-dir" if i + 1 >= args.len() => {
                eprintln!("Error: {} requires a value", args[i]);
                process::exit(1);
            }
            "--config" => {
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--bind" => {
                bind_addr = Some(args[i + 1].clone());
                i += 1;
            }
            "--upload-dir" => {
                upload_dir = Some(args[i + 1].clone());
                i += 1;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => match AppConfig::from_json_file(Path::new(&path)) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Error: {}", error);
                process::exit(1);
            }
        },
        None => AppConfig::default(),
    };
    if let Some(addr) = bind_addr {
        config.server.bind_addr = addr;
    }
    if let Some(dir) = upload_dir {
        config.storage.upload_dir = dir.into();
    }

    if let Err(error) = server::serve(config).await {
        tracing::error!("{}", error);
        process::exit(1);
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS]", program_name);
    eprintln!();
    eprintln!("Serve the urine color analysis web application.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE      Load configuration from a JSON file");
    eprintln!("  --bind ADDR        Listen address (default: 0.0.0.0:18800)");
    eprintln!("  --upload-dir DIR   Directory for stored uploads (default: uploads)");
    eprintln!("  --help, -h         Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) to change log verbosity.");
}
