use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use sockchat::application::ports::relay_port::RelayPort;
use sockchat::application::ports::session_repository::SessionRepository;
use sockchat::bootstrap::app_context::{AppContext, AppServices};
use sockchat::bootstrap::config::Config;
use sockchat::bootstrap::pipeline;
use sockchat::infrastructure::db;
use sockchat::infrastructure::db::repositories::message_repository_sqlx::SqlxMessageRepository;
use sockchat::infrastructure::db::repositories::session_repository_sqlx::SqlxSessionRepository;
use sockchat::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use sockchat::infrastructure::realtime::Hub;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "sockchat=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting sockchat");

    // Database: the pool is lazy, so an unreachable database at boot is
    // logged and the process keeps serving; affected routes fail
    // per-request and /health reports degraded.
    let pool = db::connect_pool_lazy(&cfg.database_url)?;
    match db::ping(&pool).await {
        Ok(()) => {
            info!("Database connection established");
            if let Err(e) = db::migrate(&pool).await {
                error!(error = ?e, "Database migration failed");
            }
        }
        Err(e) => {
            error!(error = ?e, "Database connection failed, continuing degraded");
        }
    }

    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));
    let message_repo = Arc::new(SqlxMessageRepository::new(pool.clone()));
    let session_repo = Arc::new(SqlxSessionRepository::new(pool.clone()));
    let hub = Hub::new();
    let relay: Arc<dyn RelayPort> = Arc::new(hub);

    let services = AppServices::new(user_repo, message_repo, session_repo.clone(), relay);
    let ctx = AppContext::new(cfg.clone(), services);

    let app = pipeline::build(ctx, pool);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Chat app listening");

    let serve_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, app).await?;
        Ok(())
    });

    // Expired sessions are swept in the background.
    let purge_repo = session_repo;
    let purge_interval = Duration::from_secs(cfg.session_purge_interval_secs);
    let purge_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        loop {
            match purge_repo.purge_expired().await {
                Ok(0) => {}
                Ok(n) => info!(purged = n, "expired_sessions_purged"),
                Err(e) => error!(error = ?e, "session_purge_failed"),
            }
            sleep(purge_interval).await;
        }
    });

    match serve_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "Server task failed"),
        Err(e) => error!(?e, "Server task panicked"),
    }

    purge_handle.abort();
    Ok(())
}
