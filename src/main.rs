use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use practice_audit::{
    create_router, AppState, AuditClient, AuditOutcome, AuditPipeline, Config, NatsEngine,
    ScenarioCatalog, SessionController, TranscriptCache, TranscriptSnapshot, Turn,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "practice-audit", about = "Practice conversations with transcript audits")]
struct Cli {
    /// Config file (extension optional)
    #[arg(long, global = true, default_value = "config/practice-audit")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP control API
    Serve,

    /// List available scenarios
    Scenarios,

    /// Audit a stored transcript and print the report
    Audit {
        /// Scenario whose rubric is used
        #[arg(long)]
        scenario: String,

        /// Transcript JSON file (defaults to the cached transcript)
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    let catalog = Arc::new(ScenarioCatalog::load(&cfg.scenarios.path)?);

    match cli.command {
        Command::Serve => serve(cfg, catalog).await,
        Command::Scenarios => {
            for scenario in catalog.list() {
                println!("{} | {} | {}", scenario.program, scenario.title, scenario.id);
            }
            Ok(())
        }
        Command::Audit {
            scenario,
            transcript,
        } => audit(cfg, &catalog, &scenario, transcript).await,
    }
}

async fn serve(cfg: Config, catalog: Arc<ScenarioCatalog>) -> Result<()> {
    info!("{} starting", cfg.service.name);

    let engine = Arc::new(NatsEngine::connect(&cfg.engine.nats_url).await?);
    let generator = Arc::new(AuditClient::new(cfg.audit.endpoint_url.clone()));
    let cache = TranscriptCache::new(&cfg.storage.transcript_cache_dir);

    info!("Audit endpoint: {}", generator.endpoint_url());
    info!("Transcript cache: {}", cache.path().display());

    let controller = SessionController::new(engine.clone(), engine, generator, catalog, Some(cache));
    let app = create_router(AppState::new(controller));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn audit(
    cfg: Config,
    catalog: &ScenarioCatalog,
    scenario_id: &str,
    transcript: Option<PathBuf>,
) -> Result<()> {
    let scenario = catalog
        .get(scenario_id)
        .with_context(|| format!("Unknown scenario: {}", scenario_id))?;

    let turns: Vec<Turn> = match transcript {
        Some(path) => {
            let json = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_slice(&json)
                .with_context(|| format!("Invalid transcript {}", path.display()))?
        }
        None => TranscriptCache::new(&cfg.storage.transcript_cache_dir).load().await?,
    };

    info!("Auditing {} turns against scenario {}", turns.len(), scenario.title);

    let pipeline = AuditPipeline::new(Arc::new(AuditClient::new(cfg.audit.endpoint_url)));
    match pipeline
        .run(scenario, &TranscriptSnapshot::from_turns(turns))
        .await
    {
        AuditOutcome::Success(report) => {
            println!("{}", report);
            Ok(())
        }
        AuditOutcome::Failure(e) => bail!("Audit failed: {}", e),
        AuditOutcome::Idle | AuditOutcome::Loading => bail!("Audit did not complete"),
    }
}
