mod config;
mod ephemeris;
mod http;
mod observer;
mod predict;
mod snapshot;
mod widgets;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::http::HttpClient;
use crate::predict::{ElementCache, FileElementStore, PassPredictor};
use crate::snapshot::{to_pretty_json, Assembler, Snapshot, SnapshotWriter};
use crate::widgets::AuroraWatch;

#[derive(Parser)]
#[command(name = "skydash")]
#[command(about = "Sky events dashboard snapshot generator")]
struct Cli {
    /// YAML configuration; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a snapshot and write it to the output file
    Update {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute a snapshot and print it
    Show,
    /// Validate a configuration file
    Validate { file: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => validate(&file),
        Commands::Update { output } => {
            let Some(config) = load_config(cli.config.as_deref()) else {
                return ExitCode::FAILURE;
            };
            let path = output.unwrap_or_else(|| config.output.path.clone());
            update(&config, path)
        }
        Commands::Show => {
            let Some(config) = load_config(cli.config.as_deref()) else {
                return ExitCode::FAILURE;
            };
            show(&config)
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Option<Config> {
    match Config::load(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            None
        }
    }
}

fn validate(path: &std::path::Path) -> ExitCode {
    match Config::from_file(path) {
        Ok(config) => {
            let site = &config.observer;
            println!("Config is valid");
            println!(
                "  observer: {:.4}, {:.4} at {} m (refraction {})",
                site.latitude_deg,
                site.longitude_deg,
                site.elevation_m,
                if site.refraction { "on" } else { "off" }
            );
            println!(
                "  satellite: {} (NORAD {}), cache in {}",
                config.satellite.key,
                config.satellite.norad_id,
                config.satellite.cache_dir.display()
            );
            println!("  output: {}", config.output.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Parse error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_snapshot(config: &Config) -> Option<Snapshot> {
    let client = match HttpClient::new(config.http.timeout_std()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            return None;
        }
    };

    let store = FileElementStore::new(config.satellite.cache_dir.clone());
    let cache = ElementCache::new(&config.satellite, store, &client);
    let predictor = PassPredictor::new(cache, config.observer, config.passes.clone());
    let aurora = AuroraWatch::new(&config.aurora, &client);

    let assembler = Assembler::new(config.observer, config.planets.clone(), &aurora, &predictor);
    Some(assembler.assemble(chrono::Utc::now()))
}

fn update(config: &Config, path: PathBuf) -> ExitCode {
    let Some(snapshot) = build_snapshot(config) else {
        return ExitCode::FAILURE;
    };

    let writer = SnapshotWriter::new(path);
    match writer.write(&snapshot) {
        Ok(()) => {
            log::info!("Updated {}", writer.path().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing snapshot: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn show(config: &Config) -> ExitCode {
    let Some(snapshot) = build_snapshot(config) else {
        return ExitCode::FAILURE;
    };

    match to_pretty_json(&snapshot) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing snapshot: {}", e);
            ExitCode::FAILURE
        }
    }
}
