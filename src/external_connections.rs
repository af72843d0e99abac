use sqlx::PgConnection;

/// A borrowed database connection. The connection goes back to where it came from
/// when the handle is dropped.
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Hands out clients for the external systems driven ports talk to, so the domain
/// doesn't have to know how those clients are built or shared
pub trait ExternalConnectivity: Sync {
    type DbHandle: ConnectionHandle + Send;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle, anyhow::Error>;
}
