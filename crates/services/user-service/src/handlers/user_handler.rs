//! User handlers.
//!
//! Every endpoint is a `GET` taking its arguments from the query string.
//! Retrieve and update honour the configured [`FilterMode`]; delete always
//! combines exactly the supplied criteria. A criterion sent empty counts as
//! not supplied.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use common::{AppError, AppResult, QueryParams, ValidatedQuery};
use domain::{FilterMode, NewUserParams, Projection, User, UserParams};

use crate::state::AppState;

/// Response of `/update`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub update_count: u64,
}

/// Response of `/delete`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub delete_count: u64,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/create", get(create_user))
        .route("/retrieve", get(retrieve_users))
        .route("/update", get(update_user))
        .route("/delete", get(delete_user))
}

fn log_ignored(mode: FilterMode, supplied: &[&str]) {
    if mode == FilterMode::FirstMatch && supplied.len() > 1 {
        debug!(used = supplied[0], ignored = ?&supplied[1..], "Lower-priority criteria ignored");
    }
}

/// Create a user from `name`, `age`, `email` and optional `phoneNumber`
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<NewUserParams>,
) -> AppResult<Json<User>> {
    info!(?params, "Create user");
    let user = params.into_new_user()?;
    let created = state.users.create(user).await?;
    info!(id = %created.id, "User created");
    Ok(Json(created))
}

/// Retrieve users matching the supplied criteria, or all users
pub async fn retrieve_users(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<UserParams>,
) -> AppResult<Json<Vec<Value>>> {
    info!(?params, mode = %state.filter_mode, "Retrieve users");
    log_ignored(state.filter_mode, &params.supplied());

    let filter = params.into_filter(state.filter_mode)?;
    let users = state.users.find(filter, Projection::all(), 0).await?;
    info!(count = users.len(), "Users retrieved");
    Ok(Json(users))
}

/// Update fields of the user identified by `_id`
pub async fn update_user(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<UserParams>,
) -> AppResult<Json<UpdateResponse>> {
    info!(?params, mode = %state.filter_mode, "Update user");
    let supplied: Vec<&str> = params
        .supplied()
        .into_iter()
        .filter(|field| *field != domain::FIELD_ID)
        .collect();
    log_ignored(state.filter_mode, &supplied);

    let (id, changes) = params.into_update(state.filter_mode)?;
    let outcome = state.users.replace(id, changes).await?;
    if outcome.matched == 0 {
        return Err(AppError::NotFound);
    }

    info!(%id, modified = outcome.modified, "User updated");
    Ok(Json(UpdateResponse {
        update_count: outcome.modified,
    }))
}

/// Delete every user matching all supplied criteria
pub async fn delete_user(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<UserParams>,
) -> AppResult<Json<DeleteResponse>> {
    info!(?params, "Delete users");
    let filter = params.into_delete_filter()?;
    let delete_count = state.users.delete_by_value(filter).await?;
    info!(delete_count, "Users deleted");
    Ok(Json(DeleteResponse { delete_count }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use mockall::predicate::eq;
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    use domain::{FilterMode, NewUser, ReplaceOutcome, UserChanges, UserFilter};

    use crate::repository::MockUserRepository;
    use crate::routes::create_router;
    use crate::state::AppState;

    async fn get_with_mode(
        repo: MockUserRepository,
        mode: FilterMode,
        uri: &str,
    ) -> (StatusCode, serde_json::Value) {
        let app = create_router(AppState::new(Arc::new(repo), mode));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(repo: MockUserRepository, uri: &str) -> (StatusCode, serde_json::Value) {
        get_with_mode(repo, FilterMode::FirstMatch, uri).await
    }

    fn by_name(name: &str) -> UserFilter {
        UserFilter {
            name: Some(name.to_string()),
            ..UserFilter::default()
        }
    }

    #[tokio::test]
    async fn test_create_without_phone_number() {
        let id = Uuid::new_v4();
        let expected = NewUser {
            name: "Ann".to_string(),
            age: 31,
            email: "ann@example.com".to_string(),
            phone_number: None,
        };

        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .with(eq(expected))
            .times(1)
            .returning(move |user| Ok(user.into_user(id)));

        let (status, body) = get(repo, "/create?name=Ann&age=31&email=ann@example.com").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"_id": id, "name": "Ann", "age": 31, "email": "ann@example.com"})
        );
    }

    #[tokio::test]
    async fn test_create_rejects_bad_age() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let (status, body) = get(repo, "/create?name=Ann&age=old&email=ann@example.com").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Request failed");
    }

    #[tokio::test]
    async fn test_create_empty_name_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let (status, body) = get(repo, "/create?name=&age=31&email=ann@example.com").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name is required");
    }

    #[tokio::test]
    async fn test_retrieve_empty_age_is_unfiltered() {
        let mut repo = MockUserRepository::new();
        repo.expect_find()
            .withf(|filter, _, _| filter.is_empty())
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let (status, _) = get(repo, "/retrieve?age=").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_retrieve_empty_name_falls_through_to_age() {
        let expected = UserFilter {
            age: Some(31),
            ..UserFilter::default()
        };
        let mut repo = MockUserRepository::new();
        repo.expect_find()
            .withf(move |filter, _, _| *filter == expected)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let (status, _) = get(repo, "/retrieve?name=&age=31").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_retrieve_name_takes_priority_over_age() {
        let mut repo = MockUserRepository::new();
        repo.expect_find()
            .withf(|filter, _, limit| *filter == by_name("Ann") && *limit == 0)
            .times(1)
            .returning(|_, _, _| Ok(vec![json!({"name": "Ann"})]));

        let (status, body) = get(repo, "/retrieve?age=31&name=Ann").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"name": "Ann"}]));
    }

    #[tokio::test]
    async fn test_retrieve_all_of_mode_combines_criteria() {
        let expected = UserFilter {
            name: Some("Ann".to_string()),
            age: Some(31),
            ..UserFilter::default()
        };
        let mut repo = MockUserRepository::new();
        repo.expect_find()
            .withf(move |filter, _, _| *filter == expected)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let (status, _) = get_with_mode(repo, FilterMode::AllOf, "/retrieve?age=31&name=Ann").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_retrieve_without_criteria_is_unfiltered() {
        let mut repo = MockUserRepository::new();
        repo.expect_find()
            .withf(|filter, _, _| filter.is_empty())
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let (status, body) = get(repo, "/retrieve").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_update_targets_id_and_writes_first_field() {
        let id = Uuid::new_v4();
        let expected = UserChanges {
            name: Some("Bea".to_string()),
            ..UserChanges::default()
        };
        let mut repo = MockUserRepository::new();
        repo.expect_replace()
            .with(eq(id), eq(expected))
            .times(1)
            .returning(|_, _| Ok(ReplaceOutcome::matched(true)));

        let uri = format!("/update?_id={}&name=Bea&age=40", id);
        let (status, body) = get(repo, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"updateCount": 1}));
    }

    #[tokio::test]
    async fn test_update_empty_name_writes_age() {
        let id = Uuid::new_v4();
        let expected = UserChanges {
            age: Some(40),
            ..UserChanges::default()
        };
        let mut repo = MockUserRepository::new();
        repo.expect_replace()
            .with(eq(id), eq(expected))
            .times(1)
            .returning(|_, _| Ok(ReplaceOutcome::matched(true)));

        let uri = format!("/update?_id={}&name=&age=40", id);
        let (status, body) = get(repo, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"updateCount": 1}));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_replace()
            .returning(|_, _| Ok(ReplaceOutcome::none()));

        let uri = format!("/update?_id={}&name=Bea", Uuid::new_v4());
        let (status, body) = get(repo, &uri).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_update_without_id_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_replace().never();

        let (status, body) = get(repo, "/update?name=Bea").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "_id is required");
    }

    #[tokio::test]
    async fn test_delete_uses_only_supplied_criteria() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete_by_value()
            .with(eq(by_name("Ann")))
            .times(1)
            .returning(|_| Ok(2));

        let (status, body) = get(repo, "/delete?name=Ann").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"deleteCount": 2}));
    }

    #[tokio::test]
    async fn test_delete_without_criteria_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete_by_value().never();

        let (status, _) = get(repo, "/delete").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_with_only_empty_criteria_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete_by_value().never();

        let (status, body) = get(repo, "/delete?name=&age=").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
