//! Database connection and collection bootstrap.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, Schema, Statement,
};

use crate::config::DatabaseConfig;

/// Database wrapper for connection management.
///
/// Acquired once at startup, shared through the router state and released
/// with [`Database::close`] after the server has shut down.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the connection pool. There is no retry on failure.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await?;
        tracing::info!("Database connected");

        Ok(Self { connection })
    }

    /// Create the collection backing `entity` if it does not exist yet.
    pub async fn ensure_collection<E: EntityTrait>(&self, entity: E) -> Result<(), DbErr> {
        let collection = entity.table_name().to_owned();
        let backend = self.connection.get_database_backend();
        let schema = Schema::new(backend);
        let mut statement = schema.create_table_from_entity(entity);
        statement.if_not_exists();

        self.connection.execute(backend.build(&statement)).await?;
        tracing::debug!(collection = %collection, "Collection ready");
        Ok(())
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(self) -> Result<(), DbErr> {
        self.connection.close().await?;
        tracing::info!("Database connection closed");
        Ok(())
    }
}

/// Execute `SELECT 1` on a connection.
pub async fn ping(connection: &DatabaseConnection) -> Result<(), DbErr> {
    connection
        .execute(Statement::from_string(
            connection.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await?;
    Ok(())
}
