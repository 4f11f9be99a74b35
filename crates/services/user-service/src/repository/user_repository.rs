//! User repository implementation.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set,
};
use serde_json::Value;
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{NewUser, Projection, ReplaceOutcome, User, UserChanges, UserFilter};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user; the identifier is generated here
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Find users matching `filter`, keeping the `projection` fields.
    /// A `limit` of 0 means no cap.
    async fn find(
        &self,
        filter: UserFilter,
        projection: Projection,
        limit: u64,
    ) -> AppResult<Vec<Value>>;

    /// Overwrite the fields present in `changes` on the user with this id
    async fn replace(&self, id: Uuid, changes: UserChanges) -> AppResult<ReplaceOutcome>;

    /// Delete every user matching all present criteria, returning the count
    async fn delete_by_value(&self, filter: UserFilter) -> AppResult<u64>;

    /// Check store connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translate a filter into an AND of exact-match conditions.
fn filter_condition(filter: &UserFilter) -> Condition {
    let mut conditions = Condition::all();

    if let Some(name) = &filter.name {
        conditions = conditions.add(user::Column::Name.eq(name.as_str()));
    }
    if let Some(age) = filter.age {
        conditions = conditions.add(user::Column::Age.eq(age));
    }
    if let Some(email) = &filter.email {
        conditions = conditions.add(user::Column::Email.eq(email.as_str()));
    }
    if let Some(phone_number) = filter.phone_number {
        conditions = conditions.add(user::Column::PhoneNumber.eq(phone_number));
    }
    if let Some(id) = filter.id {
        conditions = conditions.add(user::Column::Id.eq(id));
    }

    conditions
}

/// Condition true for rows where at least one of the changes would alter
/// the stored value.
fn changed_condition(changes: &UserChanges) -> Condition {
    let mut differs = Condition::any();

    if let Some(name) = &changes.name {
        differs = differs.add(user::Column::Name.ne(name.as_str()));
    }
    if let Some(age) = changes.age {
        differs = differs.add(user::Column::Age.ne(age));
    }
    if let Some(email) = &changes.email {
        differs = differs.add(user::Column::Email.ne(email.as_str()));
    }
    if let Some(phone_number) = changes.phone_number {
        differs = differs.add(
            Condition::any()
                .add(user::Column::PhoneNumber.ne(phone_number))
                .add(user::Column::PhoneNumber.is_null()),
        );
    }

    differs
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(user.name),
            age: Set(user.age),
            email: Set(user.email),
            phone_number: Set(user.phone_number),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn find(
        &self,
        filter: UserFilter,
        projection: Projection,
        limit: u64,
    ) -> AppResult<Vec<Value>> {
        let mut query = UserEntity::find().filter(filter_condition(&filter));
        if limit > 0 {
            query = query.limit(limit);
        }

        let models = query.all(&self.db).await.map_err(AppError::from)?;

        models
            .into_iter()
            .map(|model| projection.apply(&User::from(model)).map_err(AppError::from))
            .collect()
    }

    async fn replace(&self, id: Uuid, changes: UserChanges) -> AppResult<ReplaceOutcome> {
        if changes.is_empty() {
            return Err(AppError::validation("no fields to update"));
        }

        let mut update = UserEntity::update_many()
            .filter(user::Column::Id.eq(id))
            .filter(changed_condition(&changes));

        if let Some(name) = changes.name {
            update = update.col_expr(user::Column::Name, Expr::value(name));
        }
        if let Some(age) = changes.age {
            update = update.col_expr(user::Column::Age, Expr::value(age));
        }
        if let Some(email) = changes.email {
            update = update.col_expr(user::Column::Email, Expr::value(email));
        }
        if let Some(phone_number) = changes.phone_number {
            update = update.col_expr(user::Column::PhoneNumber, Expr::value(phone_number));
        }

        let result = update.exec(&self.db).await.map_err(AppError::from)?;
        if result.rows_affected > 0 {
            return Ok(ReplaceOutcome::matched(true));
        }

        let exists = UserEntity::find_by_id(id)
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

    async fn delete_by_value(&self, filter: UserFilter) -> AppResult<u64> {
        // An empty filter would wipe the collection
        if filter.is_empty() {
            return Err(AppError::validation("delete requires at least one criterion"));
        }

        let result = UserEntity::delete_many()
            .filter(filter_condition(&filter))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    async fn ping(&self) -> AppResult<()> {
        common::db::ping(&self.db).await.map_err(AppError::from)
    }
}
