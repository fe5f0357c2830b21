use sqlx::{Pool, Postgres};

pub type PgPool = Pool<Postgres>;

/// Lazy pool: creation never touches the network, so a down database at
/// boot leaves the process running and routes failing per-request.
pub fn connect_pool_lazy(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// Startup reachability probe; callers log the outcome and continue.
pub async fn ping(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Uses compile-time embedded migrations under ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub mod repositories;
