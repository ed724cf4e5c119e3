//! tilenames - displays the tile names used in a .tsx file

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tileutils_cli::{run, OutputFormat, RunOptions};

#[derive(Parser, Debug)]
#[command(version, about = "Displays the tilenames used in a .tsx file.", long_about = None)]
struct Args {
    /// .tsx file
    tileset: PathBuf,

    /// Output in .csv format
    #[arg(long, conflicts_with = "format")]
    csv: bool,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// File to save output to
    #[arg(long)]
    save: Option<PathBuf>,

    /// Config file to use instead of the default locations
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let options = RunOptions {
        tileset: args.tileset,
        csv: args.csv,
        format: args.format,
        save: args.save,
        config: args.config,
    };
    match run(&options, &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
