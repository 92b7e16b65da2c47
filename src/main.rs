//! Vector Scene CLI
//!
//! Usage:
//!   vector-scene [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Settings file (TOML format)
//!   -o, --output <FILE>  Write SVG here instead of stdout
//!   --bounds             Print the bounding box instead of SVG
//!   -v, --verbose        Log more (repeat for more detail)
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use vector_scene::{bounds_summary, Settings, SvgReader, SvgWriter};

#[derive(Parser)]
#[command(name = "vector-scene")]
#[command(about = "Read an SVG document into a scene graph and write it back out")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Settings file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the bounding box of the graphic instead of SVG
    #[arg(long)]
    bounds: bool,

    /// Log more; repeat for debug and trace output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    // Load settings
    let settings = match &cli.config {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let graphic = match SvgReader::with_config(settings.reader).read(&source) {
        Ok(graphic) => graphic,
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };

    let text = if cli.bounds {
        bounds_summary(&graphic, &settings.sampling)
    } else {
        SvgWriter::with_config(settings.writer.clone()).write(&graphic)
    };
    let text = match text {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let written = match &cli.output {
        Some(path) => fs::write(path, &text),
        None => {
            print!("{}", text);
            Ok(())
        }
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    }
}
