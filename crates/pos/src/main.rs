use anyhow::{Context, Result};
use dotenv::dotenv;
use pos::{
    handler::AppRouter, service::subscription::spawn_expiry_sweep, state::AppState,
};
use shared::{
    config::{Config, ConnectionManager, ConnectionPool},
    utils::init_logger,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let _log_guard = init_logger("pos", is_dev, is_enable_file);

    let config = Config::init().context("Failed to load configuration")?;

    info!("🚀 Starting POS service initialization...");

    let db_pool =
        ConnectionManager::new_pool(&config.database_url, config.db_min_conn, config.db_max_conn)
            .await
            .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let state = AppState::new(&config, db_pool)
        .await
        .context("Failed to create AppState")?;

    let sweep = config.subscription_sweep_interval.map(|every| {
        info!("⏰ Subscription sweep every {}s", every.as_secs());
        spawn_expiry_sweep(state.di_container.subscription.clone(), every)
    });

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    if let Some(handle) = sweep {
        handle.abort();
    }

    info!("✅ POS service shutdown complete.");

    Ok(())
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("✅ Database migrations applied");
    Ok(())
}
