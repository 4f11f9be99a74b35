//! Movie handlers.
//!
//! Every endpoint is a `GET` taking its arguments from the query string.
//! Endpoints writing a record validate the parameters on extraction.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use common::{AppResult, QueryParams, ValidatedQuery};
use domain::{Movie, MovieParams, Projection};

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
    pub deleted_count: u64,
}

/// Create movie routes
pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/create", get(create_movie))
        .route("/retrieve", get(retrieve_movies))
        .route("/update", get(update_movie))
        .route("/delete", get(delete_movie))
}

/// Create a movie from `title`, `year` and `language`
pub async fn create_movie(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<MovieParams>,
) -> AppResult<Json<Movie>> {
    info!(?params, "Create movie");
    let movie = params.into_new_movie()?;
    let created = state.movies.create(movie).await?;
    info!(id = %created.id, "Movie created");
    Ok(Json(created))
}

/// Retrieve movies, optionally only those released in `year`
pub async fn retrieve_movies(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<MovieParams>,
) -> AppResult<Json<Vec<Value>>> {
    info!(?params, "Retrieve movies");
    let filter = params.into_filter()?;
    let movies = state.movies.find(filter, Projection::all(), 0).await?;
    info!(count = movies.len(), "Movies retrieved");
    Ok(Json(movies))
}

/// Replace title, year and language of the movie identified by `_id`
pub async fn update_movie(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<MovieParams>,
) -> AppResult<Json<UpdateResponse>> {
    info!(?params, "Update movie");
    let (id, movie) = params.into_replacement()?;
    let outcome = state.movies.replace(id, movie).await?;
    info!(%id, matched = outcome.matched, modified = outcome.modified, "Movie replaced");
    Ok(Json(UpdateResponse {
        update_count: outcome.modified,
    }))
}

/// Delete the movie identified by `_id`
pub async fn delete_movie(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<MovieParams>,
) -> AppResult<Json<DeleteResponse>> {
    info!(?params, "Delete movie");
    let id = params.into_id()?;
    let deleted_count = state.movies.delete_by_id(id).await?;
    info!(%id, deleted_count, "Movie deleted");
    Ok(Json(DeleteResponse { deleted_count }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use mockall::predicate::{always, eq};
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    use domain::{MovieFilter, NewMovie, ReplaceOutcome};

    use crate::repository::MockMovieRepository;
    use crate::routes::create_router;
    use crate::state::AppState;

    async fn get(repo: MockMovieRepository, uri: &str) -> (StatusCode, serde_json::Value) {
        let app = create_router(AppState::new(Arc::new(repo)));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn dune() -> NewMovie {
        NewMovie {
            title: "Dune".to_string(),
            year: 2021,
            language: "English".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_returns_document() {
        let id = Uuid::new_v4();
        let mut repo = MockMovieRepository::new();
        repo.expect_create()
            .with(eq(dune()))
            .times(1)
            .returning(move |movie| Ok(movie.into_movie(id)));

        let (status, body) = get(repo, "/create?title=Dune&year=2021&language=English").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"_id": id, "title": "Dune", "year": 2021, "language": "English"})
        );
    }

    #[tokio::test]
    async fn test_create_missing_field_never_reaches_store() {
        let mut repo = MockMovieRepository::new();
        repo.expect_create().never();

        let (status, body) = get(repo, "/create?title=Dune&year=2021").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Request failed");
        assert_eq!(body["message"], "language is required");
    }

    #[tokio::test]
    async fn test_create_empty_title_never_reaches_store() {
        let mut repo = MockMovieRepository::new();
        repo.expect_create().never();

        let (status, body) = get(repo, "/create?title=&year=2021&language=English").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "title is required");
    }

    #[tokio::test]
    async fn test_retrieve_empty_year_is_unfiltered() {
        let mut repo = MockMovieRepository::new();
        repo.expect_find()
            .withf(|filter, _, _| filter.is_empty())
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let (status, _) = get(repo, "/retrieve?year=").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_retrieve_filters_by_coerced_year() {
        let mut repo = MockMovieRepository::new();
        repo.expect_find()
            .withf(|filter, projection, limit| {
                *filter == MovieFilter::by_year(2021) && projection.is_all() && *limit == 0
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![json!({"title": "Dune"})]));

        let (status, body) = get(repo, "/retrieve?year=2021").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"title": "Dune"}]));
    }

    #[tokio::test]
    async fn test_retrieve_without_year_is_unfiltered() {
        let mut repo = MockMovieRepository::new();
        repo.expect_find()
            .withf(|filter, _, _| filter.is_empty())
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let (status, body) = get(repo, "/retrieve").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_retrieve_rejects_non_numeric_year() {
        let mut repo = MockMovieRepository::new();
        repo.expect_find().never();

        let (status, body) = get(repo, "/retrieve?year=recent").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_update_reports_modified_count() {
        let id = Uuid::new_v4();
        let mut repo = MockMovieRepository::new();
        repo.expect_replace()
            .with(eq(id), eq(dune()))
            .times(1)
            .returning(|_, _| Ok(ReplaceOutcome::matched(true)));

        let uri = format!("/update?_id={}&title=Dune&year=2021&language=English", id);
        let (status, body) = get(repo, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"updateCount": 1}));
    }

    #[tokio::test]
    async fn test_update_empty_language_is_rejected() {
        let mut repo = MockMovieRepository::new();
        repo.expect_replace().never();

        let uri = format!("/update?_id={}&title=Dune&year=2021&language=", Uuid::new_v4());
        let (status, body) = get(repo, &uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "language is required");
    }

    #[tokio::test]
    async fn test_update_unknown_id_reports_zero() {
        let mut repo = MockMovieRepository::new();
        repo.expect_replace()
            .with(always(), always())
            .returning(|_, _| Ok(ReplaceOutcome::none()));

        let uri = format!(
            "/update?_id={}&title=Dune&year=2021&language=English",
            Uuid::new_v4()
        );
        let (status, body) = get(repo, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"updateCount": 0}));
    }

    #[tokio::test]
    async fn test_delete_reports_deleted_count() {
        let id = Uuid::new_v4();
        let mut repo = MockMovieRepository::new();
        repo.expect_delete_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(1));

        let (status, body) = get(repo, &format!("/delete?_id={}", id)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"deletedCount": 1}));
    }

    #[tokio::test]
    async fn test_delete_malformed_id_is_rejected() {
        let mut repo = MockMovieRepository::new();
        repo.expect_delete_by_id().never();

        let (status, body) = get(repo, "/delete?_id=42").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Request failed");
    }
}
