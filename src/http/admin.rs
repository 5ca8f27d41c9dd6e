//! Admin API: manage resources, review and prune submissions.
//!
//! Every route here sits behind [`super::auth::require_admin`].

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};

use super::AppState;
use super::error::ApiError;
use crate::store::{Entity, Resource, ResourceInput, StoreError, Submission, SubmissionQuery};

/// Routes mounted under `/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/resources", get(list_resources).post(create_resource))
        .route(
            "/resources/{id}",
            get(get_resource).put(update_resource).delete(delete_resource),
        )
        .route("/submissions", get(list_submissions))
        .route("/submissions/{id}", delete(delete_submission))
}

type IdParam = Result<Path<i64>, PathRejection>;
type InputBody = Result<Json<ResourceInput>, JsonRejection>;

fn id_of(param: IdParam) -> Result<i64, ApiError> {
    param
        .map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn input_of(body: InputBody) -> Result<ResourceInput, ApiError> {
    body.map(|Json(input)| input).map_err(|rejection| {
        if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
            ApiError::Unprocessable(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })
}

async fn list_resources(State(state): State<AppState>) -> Result<Json<Vec<Resource>>, ApiError> {
    Ok(Json(state.store.list_resources().await?))
}

async fn get_resource(
    State(state): State<AppState>,
    id: IdParam,
) -> Result<Json<Resource>, ApiError> {
    let id = id_of(id)?;
    state
        .store
        .get_resource(id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            StoreError::NotFound {
                entity: Entity::Resource,
                id,
            }
            .into()
        })
}

async fn create_resource(
    State(state): State<AppState>,
    body: InputBody,
) -> Result<(StatusCode, Json<Resource>), ApiError> {
    let input = input_of(body)?;
    let resource = state.store.create_resource(&input).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

async fn update_resource(
    State(state): State<AppState>,
    id: IdParam,
    body: InputBody,
) -> Result<Json<Resource>, ApiError> {
    let (id, input) = (id_of(id)?, input_of(body)?);
    Ok(Json(state.store.update_resource(id, &input).await?))
}

async fn delete_resource(
    State(state): State<AppState>,
    id: IdParam,
) -> Result<StatusCode, ApiError> {
    let id = id_of(id)?;
    state.store.delete_resource(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_submissions(
    State(state): State<AppState>,
    query: Result<Query<SubmissionQuery>, QueryRejection>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Json(state.store.list_submissions(&query).await?))
}

async fn delete_submission(
    State(state): State<AppState>,
    id: IdParam,
) -> Result<StatusCode, ApiError> {
    let id = id_of(id)?;
    state.store.delete_submission(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
