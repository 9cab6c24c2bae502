//! Command line and parameter file handling.
//
// A JSON parameter file provides the base values, every flag given on the
// command line replaces the matching field.

use anchor_grid::{AnchorParams, FloatTuple};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One space separated row per anchor
    Csv,
    /// The whole `[channels, height, width]` tensor
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Generate the dense anchor tensor of a feature map grid.
#[derive(Parser, Debug)]
#[command(name = "gridanchor", version)]
pub struct Cli {
    /// JSON file with the anchor parameters
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    pub width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    pub height: Option<usize>,

    /// Anchor sizes, e.g. "(0.2, 0.4)"
    #[arg(long)]
    pub sizes: Option<FloatTuple>,

    /// Anchor width to height ratios, e.g. "(1, 2, 0.5)"
    #[arg(long)]
    pub ratios: Option<FloatTuple>,

    /// Cells written by a single task
    #[arg(long)]
    pub batch_width: Option<usize>,

    /// Size of a dedicated thread pool, the global pool is used otherwise
    #[arg(long)]
    pub threads: Option<usize>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<Utf8PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default log filter, `RUST_LOG` takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// The parameter file, if any, with the command line overrides applied.
    pub fn params(&self) -> Result<AnchorParams> {
        let mut params = match &self.config {
            Some(path) => load_params(path)?,
            None => AnchorParams::default(),
        };
        if let Some(width) = self.width {
            params.width = width;
        }
        if let Some(height) = self.height {
            params.height = height;
        }
        if let Some(sizes) = &self.sizes {
            params.sizes = sizes.clone();
        }
        if let Some(ratios) = &self.ratios {
            params.ratios = ratios.clone();
        }
        if let Some(batch_width) = self.batch_width {
            params.batch_width = batch_width;
        }
        if self.threads.is_some() {
            params.threads = self.threads;
        }
        Ok(params)
    }
}

#[tracing::instrument(name = "Loading anchor parameters")]
pub fn load_params(path: &Utf8Path) -> Result<AnchorParams> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read parameter file {path}"))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Unable to parse parameter file {path}"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["gridanchor"]);
        assert_eq!(cli.params().unwrap(), AnchorParams::default());
        assert_eq!(cli.format, Format::Csv);
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "gridanchor",
            "--width",
            "8",
            "--height",
            "4",
            "--sizes",
            "(0.2, 0.4)",
            "--ratios",
            "(1, 2, 0.5)",
            "--threads",
            "2",
            "--format",
            "json",
        ]);
        let params = cli.params().unwrap();
        assert_eq!((params.width, params.height), (8, 4));
        assert_eq!(&*params.sizes, &[0.2, 0.4]);
        assert_eq!(&*params.ratios, &[1.0, 2.0, 0.5]);
        assert_eq!(params.threads, Some(2));
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn test_file_with_override() {
        let path = std::env::temp_dir().join(format!("gridanchor-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"width": 5, "height": 5, "sizes": [0.1], "ratios": "(1.0, 2.0)"}"#,
        )
        .unwrap();
        let path = Utf8PathBuf::from_path_buf(path).unwrap();

        let cli = Cli::parse_from(["gridanchor", "--config", path.as_str(), "--height", "3"]);
        let params = cli.params().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!((params.width, params.height), (5, 3));
        assert_eq!(&*params.sizes, &[0.1]);
        assert_eq!(&*params.ratios, &[1.0, 2.0]);
    }

    #[test]
    fn test_missing_file() {
        let cli = Cli::parse_from(["gridanchor", "--config", "/nonexistent/anchors.json"]);
        assert!(cli.params().is_err());
    }

    #[test]
    fn test_invalid_tuple() {
        let result = Cli::try_parse_from(["gridanchor", "--sizes", "(0.2, x)"]);
        assert!(result.is_err());
    }
}
