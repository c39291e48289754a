//! relpub: publish release binaries to object storage.
//!
//! All inputs come from the environment (or `.env`): AWS_ACCESS_KEY,
//! AWS_SECRET_KEY, BUCKET, VERSION, the artifact path variables (NGROK and
//! NGROKD by default) and GOOS. Exits non-zero on the first failure.

use anyhow::Context;
use clap::Parser;
use relpub_cli::{init_tracing, render_plan, render_report, to_json, OutputFormat};
use relpub_core::PublisherConfig;
use relpub_publisher::{plan, PublishOptions, Publisher};
use relpub_storage::create_storage;

#[derive(Parser, Debug)]
#[command(name = "relpub", about = "Publish versioned release artifacts")]
struct Cli {
    /// Resolve keys and check files without uploading (also DRY_RUN=true)
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = PublisherConfig::from_env().context("Failed to load configuration")?;
    config.dry_run |= cli.dry_run;

    let descriptors = config.descriptors();

    if config.dry_run {
        let planned = plan(&descriptors).await.map_err(|e| {
            tracing::error!(stage = e.stage(), error = %e, "Dry run failed");
            e
        })?;
        match cli.format {
            OutputFormat::Text => print!("{}", render_plan(&planned, &config.destination())),
            OutputFormat::Json => println!("{}", to_json(&planned)?),
        }
        return Ok(());
    }

    config.validate().context("Invalid configuration")?;

    let store = create_storage(&config)
        .await
        .context("Failed to create storage backend")?;

    tracing::info!(
        destination = %config.destination(),
        version = %config.version,
        artifacts = descriptors.len(),
        "Publishing release artifacts"
    );

    let publisher = Publisher::new(
        store.as_ref(),
        PublishOptions {
            upload_timeout: config.upload_timeout,
        },
    );
    let report = publisher.publish(&descriptors).await.map_err(|e| {
        tracing::error!(stage = e.stage(), error = %e, "Publish failed");
        e
    })?;

    match cli.format {
        OutputFormat::Text => print!("{}", render_report(&report)),
        OutputFormat::Json => println!("{}", to_json(&report)?),
    }

    Ok(())
}
