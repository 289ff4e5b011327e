pub mod cli;
pub mod logging;

pub use cli::{Cli, LogFormat, LogLevel};

use crate::domain::MetricRecord;
use crate::publisher::OpentsdbPublisher;
use crate::transform::Transformer;
use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Parses newline-delimited JSON records, skipping blank lines.
pub fn parse_records(input: &str) -> anyhow::Result<Vec<MetricRecord>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("invalid metric record on line {}", index + 1))
        })
        .collect()
}

async fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("failed to read metric records from stdin")?;
        Ok(content)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("failed to read metric records from {input}"))
    }
}

/// Runs a single publish cycle from the command line.
pub async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level, cli.log_format)?;

    let config = cli.plugin_config()?;
    let records = parse_records(&read_input(&cli.input).await?)?;

    let mut transformer = Transformer::new();
    if let Some(host) = cli.fallback_host() {
        transformer = transformer.with_fallback_host(host);
    }

    let mut publisher = OpentsdbPublisher::with_transformer(transformer);
    let outcome = publisher.publish(&records, &config).await?;

    info!(
        records = records.len(),
        delivered = outcome.delivered,
        dropped = outcome.dropped,
        "Publish cycle finished"
    );

    Ok(())
}
