use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use attendance::config::Config;
use attendance::db::{self, SqliteStore};
use attendance::email::SmtpNotifier;
use attendance::worker;

const NOTIFY_DRAIN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting attendance registration");

    tracing::info!("Opening database {}", config.db_path);
    let pool = db::connect(&config.db_path).await?;

    db::migrate(&pool).await?;
    tracing::info!("Migrations applied");

    let notifier = Arc::new(SmtpNotifier::new(&config.smtp));
    let (dispatcher, workers) =
        worker::start(notifier, config.notify_workers, config.notify_queue);

    let addr = config.bind_addr.clone();
    let app = attendance::build_app(config, Arc::new(SqliteStore::new(pool.clone())), dispatcher);

    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned the last dispatcher, so the queue is closed now.
    workers.shutdown(NOTIFY_DRAIN_GRACE).await;
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
