//! Movie database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Movie;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    /// Generated on insert, never by the client
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub language: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Movie {
    fn from(model: Model) -> Self {
        Movie {
            id: model.id,
            title: model.title,
            year: model.year,
            language: model.language,
        }
    }
}
