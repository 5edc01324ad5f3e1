//! Candor CLI - single-shot runner for the assessment extraction pipeline.

use anyhow::Context;
use candor_llm::GeminiClient;
use candor_orchestrator::{
    Orchestrator, OrchestratorConfig, Pipeline, ProgressEvent, RunRequest, RunStatus,
};
use candor_store::JsonRecordStore;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "candor", about = "Redact assessment documents and extract a structured report record", version)]
struct Cli {
    /// Path to the run request JSON
    request: PathBuf,

    /// Directory for persisted records and redacted audit copies
    #[arg(long, default_value = "output_records")]
    output_dir: PathBuf,

    /// Directory under which per-run workspaces are created
    #[arg(long)]
    workspace_dir: Option<PathBuf>,

    /// Orchestrator configuration file (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gemini API key; falls back to the request file's api_key field
    #[arg(long, env = "GEMINI_API_KEY")]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let raw = std::fs::read_to_string(&cli.request)
        .with_context(|| format!("cannot read request file {}", cli.request.display()))?;
    let request: RunRequest =
        serde_json::from_str(&raw).context("request file is not a valid run request")?;

    let config = match &cli.config {
        Some(path) => {
            let toml = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            OrchestratorConfig::from_toml(&toml).map_err(anyhow::Error::msg)?
        }
        None => OrchestratorConfig::default(),
    };
    config.validate().map_err(anyhow::Error::msg)?;

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| request.api_key.clone())
        .context("no API key: pass --api-key, set GEMINI_API_KEY, or add api_key to the request")?;

    let (progress, mut events) = tokio::sync::mpsc::unbounded_channel();
    let listener = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                ProgressEvent::RunStarted { total_prompts, .. } => {
                    info!("Submitting {} prompts...", total_prompts);
                }
                ProgressEvent::PromptStarted { prompt_id, attempt } if attempt > 1 => {
                    info!("Retrying {} (attempt {})", prompt_id, attempt);
                }
                ProgressEvent::PromptStarted { .. } => {}
                ProgressEvent::PromptResolved { prompt_id, success } => {
                    info!(
                        "{}: {}",
                        prompt_id,
                        if success { "resolved" } else { "failed" }
                    );
                }
                ProgressEvent::RunFinished { resolved, failed, .. } => {
                    info!("Extraction finished: {} resolved, {} failed", resolved, failed);
                }
            }
        }
    });

    let client = GeminiClient::default_endpoint(api_key);
    let orchestrator = Orchestrator::new(client, config).with_progress(progress);
    let records = JsonRecordStore::new(&cli.output_dir)?;
    let mut pipeline = Pipeline::new(orchestrator, records);
    if let Some(dir) = cli.workspace_dir.clone() {
        pipeline = pipeline.with_workspace_base(dir);
    }

    let report = pipeline.execute(request).await?;

    // the progress sender lives inside the pipeline; dropping it ends the
    // listener loop
    drop(pipeline);
    let _ = listener.await;

    match report.outcome.status {
        RunStatus::Completed => println!("Run {} completed", report.run.id),
        RunStatus::Cancelled => println!("Run {} cancelled; partial record discarded", report.run.id),
    }
    if let Some(path) = &report.record_path {
        println!("Record: {}", path.display());
    }
    if let Some(path) = &report.redacted_path {
        println!("Redacted copies: {}", path.display());
    }
    if !report.outcome.record.missing.is_empty() {
        println!(
            "Missing fields: {}",
            report.outcome.record.missing.join(", ")
        );
    }

    Ok(())
}
