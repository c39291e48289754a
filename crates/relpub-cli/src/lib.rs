use anyhow::Context;
use clap::ValueEnum;
use relpub_core::ResolvedArtifact;
use relpub_publisher::PublishReport;
use serde::Serialize;
use std::fmt::Write as _;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Initialize tracing for CLI binaries.
///
/// `RUST_LOG` filters (default `info`); `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

pub fn to_json(value: &impl Serialize) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Serialize output")
}

/// One line per artifact: key, size, digest, url.
pub fn render_report(report: &PublishReport) -> String {
    let mut out = String::new();
    for artifact in &report.artifacts {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            artifact.key, artifact.size_bytes, artifact.sha256, artifact.url
        );
    }
    let _ = writeln!(
        out,
        "published {} artifact(s), {} bytes to {}",
        report.artifacts.len(),
        report.total_bytes(),
        report.backend
    );
    out
}

/// One line per planned upload: source path and destination key.
pub fn render_plan(planned: &[ResolvedArtifact], destination: &str) -> String {
    let mut out = String::new();
    for artifact in planned {
        let _ = writeln!(
            out,
            "{} -> {}/{}",
            artifact.effective_path.display(),
            destination.trim_end_matches('/'),
            artifact.key
        );
    }
    let _ = writeln!(out, "dry run: {} artifact(s), nothing uploaded", planned.len());
    out
}
