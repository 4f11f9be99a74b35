//! Movie repository implementation.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set,
};
use serde_json::Value;
use uuid::Uuid;

use super::entities::movie::{self, ActiveModel, Entity as MovieEntity};
use common::{AppError, AppResult};
use domain::{Movie, MovieFilter, NewMovie, Projection, ReplaceOutcome};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Movie repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Persist a new movie; the identifier is generated here
    async fn create(&self, movie: NewMovie) -> AppResult<Movie>;

    /// Find movies matching `filter`, keeping the `projection` fields.
    /// A `limit` of 0 means no cap.
    async fn find(
        &self,
        filter: MovieFilter,
        projection: Projection,
        limit: u64,
    ) -> AppResult<Vec<Value>>;

    /// Overwrite title, year and language of the movie with this id
    async fn replace(&self, id: Uuid, movie: NewMovie) -> AppResult<ReplaceOutcome>;

    /// Delete the movie with this id, returning the count removed
    async fn delete_by_id(&self, id: Uuid) -> AppResult<u64>;

    /// Check store connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of MovieRepository
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translate a filter into an AND of exact-match conditions.
fn filter_condition(filter: &MovieFilter) -> Condition {
    let mut conditions = Condition::all();

    if let Some(id) = filter.id {
        conditions = conditions.add(movie::Column::Id.eq(id));
    }
    if let Some(title) = &filter.title {
        conditions = conditions.add(movie::Column::Title.eq(title.as_str()));
    }
    if let Some(year) = filter.year {
        conditions = conditions.add(movie::Column::Year.eq(year));
    }
    if let Some(language) = &filter.language {
        conditions = conditions.add(movie::Column::Language.eq(language.as_str()));
    }

    conditions
}

#[async_trait]
impl MovieRepository for MovieStore {
    async fn create(&self, movie: NewMovie) -> AppResult<Movie> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(movie.title),
            year: Set(movie.year),
            language: Set(movie.language),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Movie::from(model))
    }

    async fn find(
        &self,
        filter: MovieFilter,
        projection: Projection,
        limit: u64,
    ) -> AppResult<Vec<Value>> {
        let mut query = MovieEntity::find().filter(filter_condition(&filter));
        if limit > 0 {
            query = query.limit(limit);
        }

        let models = query.all(&self.db).await.map_err(AppError::from)?;

        models
            .into_iter()
            .map(|model| projection.apply(&Movie::from(model)).map_err(AppError::from))
            .collect()
    }

    async fn replace(&self, id: Uuid, movie: NewMovie) -> AppResult<ReplaceOutcome> {
        // Only rows whose values differ count as modified
        let changed = Condition::any()
            .add(movie::Column::Title.ne(movie.title.as_str()))
            .add(movie::Column::Year.ne(movie.year))
            .add(movie::Column::Language.ne(movie.language.as_str()));

        let result = MovieEntity::update_many()
            .col_expr(movie::Column::Title, Expr::value(movie.title))
            .col_expr(movie::Column::Year, Expr::value(movie.year))
            .col_expr(movie::Column::Language, Expr::value(movie.language))
            .filter(movie::Column::Id.eq(id))
            .filter(changed)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected > 0 {
            return Ok(ReplaceOutcome::matched(true));
        }

        let exists = MovieEntity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(AppError::from)?
            > 0;

        Ok(if exists {
            ReplaceOutcome::matched(false)
        } else {
            ReplaceOutcome::none()
        })
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<u64> {
        let result = MovieEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    async fn ping(&self) -> AppResult<()> {
        common::db::ping(&self.db).await.map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_conditions() {
        assert!(filter_condition(&MovieFilter::any()).is_empty());
    }

    #[test]
    fn test_year_filter_adds_one_condition() {
        assert_eq!(filter_condition(&MovieFilter::by_year(2021)).len(), 1);
    }
}
