//! Command line tools for inspecting Tiled tilesets
//!
//! The `tilenames` binary lists the tile names of a `.tsx` file along with
//! any name used more than once. This crate holds the pieces it is built
//! from so they can be tested without spawning a process.

pub mod config;
pub mod render;

use anyhow::{bail, Context};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tileutils_core::TileNameReport;

pub use config::{ConfigError, TilenamesConfig};
pub use render::{render, RenderError};

/// How `tilenames` prints its report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

/// Errors produced while building the `tilenames` output
#[derive(Debug, thiserror::Error)]
pub enum TilenamesError {
    #[error(transparent)]
    Load(#[from] tileutils_tsx::TsxError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Load a tileset and render its name report
pub fn tile_names_output(path: &Path, format: OutputFormat) -> Result<String, TilenamesError> {
    let tileset = tileutils_tsx::load_tileset(path)?;
    let report = TileNameReport::from_tileset(&tileset);
    log::debug!(
        "Report for '{}': {} names, {} duplicated",
        report.tileset_name,
        report.names.len(),
        report.duplicates.len()
    );
    Ok(render(&report, format)?)
}

/// Options for one `tilenames` invocation, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub tileset: PathBuf,
    pub csv: bool,
    pub format: Option<OutputFormat>,
    pub save: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// `--csv` beats `--format`, which beats the config file
pub fn resolve_format(
    csv: bool,
    format: Option<OutputFormat>,
    config: &TilenamesConfig,
) -> OutputFormat {
    if csv {
        OutputFormat::Csv
    } else {
        format.unwrap_or(config.output.format)
    }
}

/// Run `tilenames`, printing to `out` unless the report is saved to a file
pub fn run(options: &RunOptions, out: &mut impl Write) -> anyhow::Result<()> {
    // Chance to give a descriptive error message.
    if !options.tileset.is_file() {
        bail!("Problem opening {}. No such file.", options.tileset.display());
    }

    let config = TilenamesConfig::discover(options.config.as_deref())
        .context("Problem reading configuration")?;
    let format = resolve_format(options.csv, options.format, &config);

    let output = tile_names_output(&options.tileset, format)
        .with_context(|| format!("Problem opening {}", options.tileset.display()))?;

    match &options.save {
        Some(path) => std::fs::write(path, output).context("Problem saving file")?,
        None => writeln!(out, "{output}")?,
    }

    Ok(())
}
