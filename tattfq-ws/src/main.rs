//! tattfq-ws (Web Survey) - TATTFQ questionnaire collection and IPA analysis
//!
//! Serves the respondent wizard API and the admin dashboard over one SQLite
//! database. Zero-config startup: the database is created on first run
//! inside the resolved root folder.

use anyhow::Result;
use clap::Parser;
use tattfq_common::config;
use tattfq_common::db::init_database;
use tattfq_ws::{build_router, AppState};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "tattfq-ws", about = "TATTFQ web survey service")]
struct Args {
    /// Root folder holding the database (overrides env var and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "TATTFQ_HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5780, env = "TATTFQ_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    // Log identification immediately after tracing init
    info!(
        "Starting TATTFQ Web Survey (tattfq-ws) v{} ({})",
        env!("CARGO_PKG_VERSION"),
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder)?;

    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    // Create application state and router
    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("tattfq-ws listening on http://{}:{}", args.host, args.port);
    info!("Health check: http://{}:{}/health", args.host, args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
