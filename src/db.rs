use crate::errors::StoreError;
use anyhow::Context;
use deadpool_diesel::Runtime;
use deadpool_diesel::postgres::{Manager, Pool};
use diesel::PgConnection;
use diesel::connection::{Connection, SimpleConnection};
use tracing::{debug, error, info};

/// DDL for all ten tables. Every statement is idempotent.
pub const SCHEMA_DDL: &str = include_str!("schema.sql");

pub fn init_pool(conn_str: &str, max_size: u32) -> anyhow::Result<Pool> {
    let manager = Manager::new(conn_str, Runtime::Tokio1);
    let pool = Pool::builder(manager)
        .max_size(max_size as usize)
        .build()
        .context("Failed to build database pool")?;
    Ok(pool)
}

/// Checks a connection out of `pool`, runs `query` on the blocking worker and
/// hands the connection back when the guard drops, on success and failure alike.
pub async fn run_query<T, E, F>(pool: &Pool, query: F) -> Result<T, StoreError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<StoreError> + Send + 'static,
{
    let conn = pool.get().await.map_err(|pool_err| {
        error!(
            "Failed to get DB connection object from pool: {:?}",
            pool_err
        );
        StoreError::from(pool_err)
    })?;
    debug!("DB connection object obtained from pool for interaction");

    conn.interact(query).await?.map_err(Into::into)
}

/// Creates any missing tables, constraints and indexes in one transaction.
pub fn setup_schema(conn: &mut PgConnection) -> Result<(), StoreError> {
    conn.transaction::<_, StoreError, _>(|tx_conn| {
        tx_conn.batch_execute(SCHEMA_DDL)?;
        Ok(())
    })?;
    info!("Schema is in place");
    Ok(())
}
