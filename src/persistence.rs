pub mod db_todo_driven_ports;

use crate::external_connections;
use crate::external_connections::ConnectionHandle;
use anyhow::Context;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};

/// Data structure which owns clients for connecting to external systems.
/// Allows business logic to be agnostic of the external systems it communicates with
/// so driven adapters can easily be swapped out for other implementations
#[derive(Clone)]
pub struct ExternalConnectivity {
    db: PgPool,
}

impl ExternalConnectivity {
    /// Wraps the shared database pool. Cloning is cheap, every clone borrows from the same pool.
    pub fn new(db: PgPool) -> Self {
        ExternalConnectivity { db }
    }

    /// Closes the underlying pool, waiting for borrowed connections to come back
    pub async fn close(&self) {
        self.db.close().await;
    }
}

/// A connection borrowed from the pool, returned to it on drop
pub struct PoolConnectionHandle {
    active_connection: PoolConnection<Postgres>,
}

impl ConnectionHandle for PoolConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection {
        &mut self.active_connection
    }
}

impl external_connections::ExternalConnectivity for ExternalConnectivity {
    type DbHandle = PoolConnectionHandle;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle, anyhow::Error> {
        let active_connection = self
            .db
            .acquire()
            .await
            .context("acquiring a connection from the database pool")?;

        Ok(PoolConnectionHandle { active_connection })
    }
}
