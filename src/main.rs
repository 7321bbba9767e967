//! idml-filter - Extract and merge IDML text

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use idml_filter::{FilterConfig, FilterEvent, roundtrip};

#[derive(Parser)]
#[command(name = "idml-filter")]
#[command(version, about = "Extract translatable text from IDML packages", long_about = None)]
#[command(after_help = "EXAMPLES:
    idml-filter extract brochure.idml            List text units
    idml-filter extract --json brochure.idml     List text units as JSON
    idml-filter roundtrip in.idml out.idml       Extract and merge back unchanged")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Filter options as a JSON file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Suppress output messages
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the text units of a package
    Extract {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Extract a package and write it back without edits
    Roundtrip {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct UnitRecord<'a> {
    id: &'a str,
    /// Coded text with every code rendered by its data.
    source: String,
    /// Literal text without codes.
    text: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match FilterConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => FilterConfig::default(),
    };

    let result = match &cli.command {
        Command::Extract { input, json } => extract(input, &config, *json),
        Command::Roundtrip { input, output } => convert(input, output, &config, cli.quiet),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn extract(input: &Path, config: &FilterConfig, json: bool) -> Result<(), String> {
    let events = idml_filter::extract(input, config).map_err(|e| e.to_string())?;
    let units: Vec<UnitRecord<'_>> = events
        .iter()
        .filter_map(FilterEvent::as_text_unit)
        .map(|unit| UnitRecord {
            id: &unit.id,
            source: unit.source.to_string(),
            text: unit.source.text(),
        })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&units).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        for unit in &units {
            println!("{}\t{}", unit.id, unit.source);
        }
    }
    Ok(())
}

fn convert(input: &Path, output: &Path, config: &FilterConfig, quiet: bool) -> Result<(), String> {
    roundtrip(input, output, config).map_err(|e| e.to_string())?;
    if !quiet {
        println!("{} -> {}", input.display(), output.display());
    }
    Ok(())
}
