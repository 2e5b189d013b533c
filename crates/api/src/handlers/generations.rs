//! Handlers for the generation endpoints.
//!
//! Routes:
//! - `POST /generations`       — create (charge + provider submit)
//! - `GET  /generations`       — history listing
//! - `GET  /generations/{id}`  — status poll by provider correlation id
//!
//! The protocols themselves live in [`crate::orchestrator`]; these handlers
//! only adapt HTTP to it.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use logoloco_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::orchestrator::{self, CreateGenerationRequest};
use crate::query::HistoryParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/generations
pub async fn create_generation(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateGenerationRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = orchestrator::create_generation(&state, &user, request).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/generations/{prediction_id}
pub async fn poll_generation(
    user: AuthUser,
    State(state): State<AppState>,
    Path(prediction_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let outcome = orchestrator::poll_generation(&state, &user, &prediction_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/generations
pub async fn list_generations(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let page = orchestrator::list_history(&state, &user, params.status, limit, offset).await?;
    Ok(Json(DataResponse { data: page }))
}
