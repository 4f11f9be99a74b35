//! Infrastructure layer - store connection.

use common::{Database, DatabaseConfig};
use sea_orm::DbErr;

use crate::repository::entities::movie;

/// Connect to the store and make sure the movies collection exists.
pub async fn open_database(config: &DatabaseConfig) -> Result<Database, DbErr> {
    let db = Database::connect(config).await?;
    db.ensure_collection(movie::Entity).await?;
    Ok(db)
}
