use movie_recommender::{
    config::Config,
    routes::{create_router, AppState},
    store::StoreSnapshot,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Startup cannot proceed without usable stores
    let load_config = config.clone();
    let snapshot = tokio::task::spawn_blocking(move || StoreSnapshot::load(&load_config)).await??;

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, snapshot);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
