use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use triplog::config::AppConfig;
use triplog::db::{init_pool, run_migrations};
use triplog::error::AppError;
use triplog::routes::create_router;
use triplog::services::kv::SqliteKvStore;
use triplog::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = init_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    let kv = Arc::new(SqliteKvStore::new(db));
    let state = AppState::new(config.clone(), kv);
    // Sign-in state must be known before the first request is served.
    state.session.restore().await;

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,triplog=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
