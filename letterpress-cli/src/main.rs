//! # Letterpress
//!
//! Command-line entry point for the Letterpress canvas editor.

use clap::Parser;
use letterpress_cli::{run, CliArgs, CliConfig, RunOutput};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,letterpress_core=debug,letterpress_renderer=debug")
    });

    // Logs go to stderr; stdout carries rendered HTML
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = CliConfig::from(args);
    tracing::debug!(?config, "Starting Letterpress");

    match run(config).await? {
        RunOutput::Rendered(html) => println!("{html}"),
        RunOutput::Synced { path, bytes } => {
            tracing::info!("Synced canvas into {} ({bytes} bytes)", path.display());
        }
        RunOutput::NothingToSync => {
            tracing::warn!("Canvas is empty; document left unchanged");
        }
    }
    Ok(())
}
