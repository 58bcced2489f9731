mod config;
mod docx;
mod errors;
mod extract;
mod llm_client;
mod pipeline;
mod render;
mod resume;
mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::batch::discover_inputs;
use crate::pipeline::Pipeline;
use crate::state::SharedAssets;

/// Converts resumes (.pdf / .txt) into templated HTML and DOCX documents.
#[derive(Parser, Debug)]
#[command(name = "resume-convertor", version, about)]
struct Cli {
    /// A resume file, or a directory whose top-level .pdf/.txt files are converted.
    input: PathBuf,

    /// Where the .html and .docx files are written.
    #[arg(short, long, env = "RESUME_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Files converted at the same time.
    #[arg(short, long, env = "RESUME_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Log every stage, including the mapped resume data.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(n) = cli.concurrency {
        config.concurrency = n.max(1);
    }

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(log_filter(cli.debug))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume convertor v{}", env!("CARGO_PKG_VERSION"));

    let inputs = if cli.input.is_file() {
        vec![cli.input.clone()]
    } else if cli.input.is_dir() {
        discover_inputs(&cli.input)
            .with_context(|| format!("Failed to list {}", cli.input.display()))?
    } else {
        bail!("Input path {} does not exist", cli.input.display());
    };
    if inputs.is_empty() {
        warn!("No .pdf or .txt files found in {}", cli.input.display());
        return Ok(());
    }

    let llm = LlmClient::new(config.llm_settings()).context("Failed to build the HTTP client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let assets = SharedAssets::load(&config)?;
    let output_dir = config.resolved_output_dir()?;
    info!("Writing output to {}", output_dir.display());

    let pipeline = Pipeline::new(Arc::new(llm), Arc::new(assets), output_dir);

    let started = Instant::now();
    let report = pipeline.run_batch(inputs, config.concurrency).await;
    info!(
        "Total time taken for processing all files: {:.2} seconds",
        started.elapsed().as_secs_f64()
    );

    for outcome in report.outcomes.iter().filter(|o| o.result.is_err()) {
        warn!(
            "Not converted: {} (gave up after {:.2} seconds)",
            outcome.input.display(),
            outcome.elapsed.as_secs_f64()
        );
    }

    Ok(())
}

/// `--debug` always turns on debug output for this crate; otherwise `RUST_LOG`
/// applies, falling back to `info`.
fn log_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new(format!("{}=debug", env!("CARGO_CRATE_NAME")));
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_overrides_rust_log() {
        std::env::set_var("RUST_LOG", "warn");
        let filter = log_filter(true).to_string();
        std::env::remove_var("RUST_LOG");
        assert_eq!(filter, format!("{}=debug", env!("CARGO_CRATE_NAME")));
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from(["resume-convertor", "Resumes", "--debug", "-c", "3"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("Resumes"));
        assert!(cli.debug);
        assert_eq!(cli.concurrency, Some(3));
    }
}
