//! profiled - user profile record service
//!
//! Single-resource HTTP service managing user profile records with photo
//! upload, bulk create, and bulk partial-update.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use profiled::assets::AssetStore;
use profiled::config::{Cli, ServiceConfig};
use profiled::db::{self, UserRepository};
use profiled::service::UserService;
use profiled::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting profiled v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let config = ServiceConfig::resolve(&cli);
    config.ensure_directories()?;

    let db_path = config.database_path();
    let pool = db::init_database(&db_path).await?;
    info!("✓ Database ready: {}", db_path.display());

    // Collaborators are constructed here and injected; no globals
    let repo = UserRepository::new(pool);
    let assets = AssetStore::new(config.uploads_dir());
    let state = AppState::new(UserService::new(repo, assets));
    let app = build_router(state, &config.uploads_dir());

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("profiled listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
