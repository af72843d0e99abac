use std::str::FromStr;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use thiserror::Error;
use tracing::info;

const MAX_CONNECTIONS: u32 = 20;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("no database connection string was provided")]
    MissingConnectionString,
    #[error("the database connection string could not be parsed: {0}")]
    MalformedConnectionString(#[source] sqlx::Error),
    #[error("could not connect to the database: {0}")]
    Unreachable(#[source] sqlx::Error),
}

impl ConnectError {
    /// True when the failure is due to bad configuration rather than an unreachable database
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::Unreachable(_))
    }
}

/// Parses a PostgreSQL connection string into connection options
fn connect_options(db_url: &str) -> Result<PgConnectOptions, ConnectError> {
    if db_url.trim().is_empty() {
        return Err(ConnectError::MissingConnectionString);
    }

    PgConnectOptions::from_str(db_url).map_err(ConnectError::MalformedConnectionString)
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Builds the shared connection pool and makes sure the database can actually be reached
/// before handing it out
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool, ConnectError> {
    let options = connect_options(db_url)?;
    let pool = pool_options()
        .connect_with(options)
        .await
        .map_err(ConnectError::Unreachable)?;

    info!(max_connections = MAX_CONNECTIONS, "Connected to the database");
    Ok(pool)
}

/// Builds the shared connection pool without opening any connections. Connections are
/// established the first time one is acquired.
pub fn connect_sqlx_lazy(db_url: &str) -> Result<PgPool, ConnectError> {
    let options = connect_options(db_url)?;
    Ok(pool_options().connect_lazy_with(options))
}
