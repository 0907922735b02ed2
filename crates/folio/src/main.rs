//! folio - build a markdown documentation site and serve it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use folio_server::{ServerConfig, SiteServer};
use folio_static::{select_source, AssetPipeline, BuildConfig, StaticBuilder, TemplateEngine};

mod config;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Build a markdown documentation site and serve it")]
#[command(version)]
pub struct Cli {
    /// Path to folio.toml config file
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt().with_env_filter(filter).with_target(false).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }

    let file_config = config::load_config(&cli.config)?;
    let port = config::resolve_port(
        cli.port,
        std::env::var("PORT").ok().as_deref(),
        file_config.server.port,
    );
    let output_dir = file_config.site.output_dir;

    AssetPipeline::stage(&output_dir).context("Error writing static files")?;

    let templates = Arc::new(load_templates(file_config.site.template.as_deref())?);

    let source = select_source(&file_config.site.docs_dir);
    let report = StaticBuilder::new(
        BuildConfig {
            output_dir: output_dir.clone(),
        },
        source,
        Arc::clone(&templates),
    )
    .build()
    .context("Error converting markdown files")?;

    tracing::info!(
        "Built {} pages from {} docs in {}ms",
        report.pages,
        report.source,
        report.duration_ms
    );

    let server = SiteServer::new(
        ServerConfig {
            output_dir,
            port,
            host: file_config.server.host,
        },
        templates,
    );
    server.start().await?;

    Ok(())
}

/// Load the page template: a custom file if configured, the bundled theme
/// otherwise.
fn load_templates(path: Option<&Path>) -> Result<TemplateEngine> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read template {}", path.display()))?;
            let engine = TemplateEngine::from_source(source)
                .with_context(|| format!("Failed to parse template {}", path.display()))?;
            tracing::info!("Using template {}", path.display());
            Ok(engine)
        }
        None => TemplateEngine::new().context("Failed to parse bundled template"),
    }
}
