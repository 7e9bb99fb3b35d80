use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airworthiness_intel::app::{AppError, AppState};
use airworthiness_intel::model::{AnalysisRequest, Config};

/// Analyze Airworthiness Directive applicability and risk for one aircraft
#[derive(Parser, Debug)]
#[command(name = "airworthiness-intel", version, about)]
struct Args {
    /// JSON analysis request (tail number, identity or registry, candidates, defects)
    #[arg(short, long, value_name = "FILE")]
    request: PathBuf,

    /// JSON directive catalog used to look up ADs by model
    #[arg(short, long, value_name = "FILE", env = "AIRWORTHINESS_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout carries only the result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    let state = AppState::new(config, args.catalog.as_deref()).await?;

    let contents = tokio::fs::read_to_string(&args.request)
        .await
        .map_err(|source| AppError::Io {
            path: args.request.display().to_string(),
            source,
        })?;
    let request: AnalysisRequest = serde_json::from_str(&contents)?;

    tracing::info!(
        tail = %request.tail_number,
        candidates = request.candidates.len(),
        escalation = state.escalation_enabled,
        "Starting aircraft analysis"
    );

    let result = state.analysis_service.analyze(request).await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{output}");

    Ok(())
}
