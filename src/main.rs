use anyhow::{Context, Result};
use clap::Parser;
use gridanchor::config::{Cli, LogFormat};
use gridanchor::export::export;
use gridanchor::telemetry::{get_subscriber_json, get_subscriber_terminal, init_subscriber};

const APP_NAME: &str = "gridanchor";

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.log_format {
        LogFormat::Json => init_subscriber(get_subscriber_json(
            APP_NAME.into(),
            cli.log_level.clone(),
            std::io::stderr,
        ))?,
        LogFormat::Pretty => init_subscriber(get_subscriber_terminal(cli.log_level.clone()))?,
    }

    let params = cli.params()?;
    tracing::debug!(?params, "resolved parameters");

    let anchors = params
        .generate::<f32>()
        .context("Unable to generate anchors")?;
    export(&anchors, cli.format, cli.output.as_deref())?;
    Ok(())
}
