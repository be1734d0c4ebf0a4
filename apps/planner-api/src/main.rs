//! Planner API Server - Backend for the content planning assistant
//!
//! Provides REST endpoints for:
//! - The three-step business form wizard
//! - Business submissions and their competitors
//! - Mock competitor analysis results
//! - The topics browser (sort and filter)
//! - The project dashboard

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod handlers;
mod seed;
mod sqlite;
mod state;

use sqlite::SqliteBackend;
use state::AppState;

/// Command-line arguments for the planner API server
#[derive(Parser, Debug)]
#[command(name = "planner-api")]
#[command(about = "Content planning assistant API server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// SQLite connection URL (defaults to a file in the platform data directory)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// JSON file of topics to load at startup
    #[arg(long, env = "SEED_TOPICS")]
    seed_topics: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the router with every endpoint and middleware layer
pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Dashboard
        .route("/api/dashboard", get(handlers::dashboard))
        // Submission endpoints
        .route(
            "/api/submissions",
            get(handlers::list_submissions).post(handlers::create_submission),
        )
        .route("/api/submissions/:id", get(handlers::get_submission))
        .route(
            "/api/submissions/:id/competitors",
            get(handlers::list_competitors),
        )
        .route("/api/submissions/:id/results", get(handlers::get_results))
        // Topics browser
        .route("/api/topics", get(handlers::list_topics))
        // Form wizard
        .route("/api/wizard", post(handlers::start_wizard))
        .route("/api/wizard/:id", get(handlers::get_wizard))
        .route("/api/wizard/:id/business", post(handlers::wizard_business))
        .route("/api/wizard/:id/audience", post(handlers::wizard_audience))
        .route("/api/wizard/:id/back", post(handlers::wizard_back))
        .route("/api/wizard/:id/submit", post(handlers::wizard_submit))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("planner_api={}", log_level).parse()?)
                .add_directive(format!("planner_core={}", log_level).parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize application state
    info!("Initializing planner API...");
    let database_url = args
        .database_url
        .clone()
        .unwrap_or_else(state::default_database_url);
    let backend = SqliteBackend::connect(&database_url).await?;

    if let Some(path) = &args.seed_topics {
        seed::seed_topics_from_file(&backend, path).await?;
    }

    let state = Arc::new(AppState::new(Arc::new(backend)));
    let app = router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting planner API on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
