use clap::Parser;
use recipe_recall::{
    api::{create_router, AppState},
    cli::{commands, Cli, Commands},
    config::Settings,
    corpus::{Corpus, CorpusHandle, DirectorySource, DocumentSource, RefreshScheduler},
    recall::RecallEngine,
    Error, Result,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipe_recall=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::from_env()?;
    settings.validate()?;

    // Handle commands
    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Parse { file } => {
            commands::parse(&file)?;
        }
        Commands::Stats { step } => {
            commands::stats(&settings.corpus.dishes_dir, step)?;
        }
        Commands::Recall {
            query,
            fulltext,
            limit,
        } => {
            commands::recall(
                &settings.corpus.dishes_dir,
                settings.recall.options(),
                &query,
                fulltext,
                limit,
            )?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting Recipe Recall server");
    info!("Dishes directory: {:?}", settings.corpus.dishes_dir);
    info!("Server: {}:{}", settings.server.host, settings.server.port);

    // Build the initial corpus off the async runtime
    let source: Arc<dyn DocumentSource> =
        Arc::new(DirectorySource::new(settings.corpus.dishes_dir.clone()));
    let initial_source = source.clone();
    let (corpus, report) =
        tokio::task::spawn_blocking(move || Corpus::load(initial_source.as_ref()))
            .await
            .map_err(|e| Error::Internal(format!("Corpus build task failed: {e}")))??;

    if !report.failures.is_empty() {
        warn!(
            "{} documents failed to parse - check logs for details",
            report.failures.len()
        );
    }
    info!(
        "Corpus ready: {} recipes, {} materials",
        corpus.len(),
        corpus.material_index().len()
    );

    let handle = CorpusHandle::new(corpus);

    // Start background refresh if enabled
    if settings.corpus.refresh_interval_seconds > 0 {
        let scheduler = RefreshScheduler::new(
            handle.clone(),
            source,
            settings.corpus.refresh_interval_seconds,
        );
        let _refresh_handle = scheduler.start();
    }

    info!("Loading tokenizer dictionary");
    let engine = Arc::new(RecallEngine::new(settings.recall.options()));
    info!(
        "Recall engine ready (exact match policy: {:?})",
        settings.recall.exact_policy
    );

    let state = AppState {
        corpus: handle,
        engine,
        settings: settings.clone(),
    };

    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Recipe Recall Server");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("\nAPI Endpoints:");
    println!("  GET  /api/recipes");
    println!("  GET  /api/recipes/:name");
    println!("  GET  /api/recipes/:name/raw");
    println!("  GET  /api/recall?q=");
    println!("  GET  /api/recall/fulltext?q=");
    println!("  GET  /api/materials");
    println!("  GET  /api/materials/:material");
    println!("  GET  /api/stats");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}
