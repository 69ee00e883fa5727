use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

/// Builds the shared connection pool.
///
/// The pool connects lazily: the first query opens the physical connection
/// and the handle is reused for the rest of the process lifetime. Concurrent
/// first callers are serialized inside the pool, so there is no
/// duplicate-connection race on a cold start.
pub fn connect_lazy(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(&config.database_url)?;
    Ok(pool)
}
