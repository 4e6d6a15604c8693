use catalogo_server::{config, db, metrics, routes, services};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    dotenvy::dotenv().ok();
    let config = config::AppConfig::build()?;

    // 2. Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.rust_log))
        .init();

    tracing::info!("Starting catalogo-server...");

    // 3. Initialize database
    let conn = db::connect(&config.database).await?;
    db::apply_schema(&conn).await?;
    let repo = db::Repository::new(conn);
    tracing::info!("Connected to database");

    // 4. Initialize app state (services)
    let state = services::AppState::new(repo.clone());

    // 5. Metrics recorder + /metrics route
    let metrics_router = metrics::setup_metrics()?;

    // 6. Setup router
    let app = routes::create_router(state, repo, metrics_router);

    // 7. Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
