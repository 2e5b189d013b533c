//! Admin handlers for credit management.
//!
//! All endpoints require [`RequireAdmin`] (email-list gated).
//!
//! Routes:
//! - `POST /admin/credits/adjust`              — manual balance adjustment
//! - `GET  /admin/users/{user_id}/balance`      — a user's balance row
//! - `GET  /admin/users/{user_id}/transactions` — a user's transaction log

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use logoloco_core::actor::Actor;
use logoloco_core::error::CoreError;
use logoloco_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use logoloco_db::repositories::LedgerRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Credit adjustment
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    Add,
    Remove,
}

#[derive(Debug, Deserialize)]
pub struct AdjustCreditsRequest {
    pub user_id: String,
    pub amount: i32,
    #[serde(rename = "type")]
    pub direction: AdjustDirection,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct AdjustCreditsResponse {
    pub user_id: String,
    pub amount: i32,
    pub reason: String,
    pub new_balance: i32,
    pub performed_by: String,
}

/// POST /api/v1/admin/credits/adjust
///
/// Manually adjust a user's balance. Removals that would take the balance
/// below zero are rejected with the current balance in the response body.
pub async fn adjust_credits(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<AdjustCreditsRequest>,
) -> AppResult<Response> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".into()));
    }
    if request.amount <= 0 {
        return Err(AppError::BadRequest("amount must be positive".into()));
    }
    if request.reason.trim().is_empty() || request.reason.len() > 500 {
        return Err(AppError::BadRequest(
            "reason must be 1-500 characters".into(),
        ));
    }

    let delta = match request.direction {
        AdjustDirection::Add => request.amount,
        AdjustDirection::Remove => -request.amount,
    };

    let outcome = LedgerRepo::adjust(
        &state.pool,
        &request.user_id,
        delta,
        &format!("Admin adjustment: {}", request.reason),
        &Actor::Admin(admin.user_id.clone()),
        Some(json!({ "adminEmail": admin.email.clone(), "reason": request.reason.clone() })),
        state.config.signup_bonus_credits,
    )
    .await?;

    if !outcome.success {
        // Distinct from the generation path's 402: an admin removal that
        // exceeds the balance is a plain bad request.
        let body = json!({
            "error": "Insufficient credits",
            "current_balance": outcome.new_balance,
            "requested_removal": request.amount,
        });
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    tracing::info!(
        admin = %admin.email,
        user_id = %request.user_id,
        delta,
        reason = %request.reason,
        "Admin adjusted credits",
    );

    Ok(Json(DataResponse {
        data: AdjustCreditsResponse {
            user_id: request.user_id,
            amount: request.amount,
            reason: request.reason,
            new_balance: outcome.new_balance,
            performed_by: admin.email,
        },
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// User inspection
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users/{user_id}/balance
///
/// A user's balance row. 404 when the user has never touched credits; the
/// admin surface does not initialize accounts as a side effect.
pub async fn get_user_balance(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let balance = LedgerRepo::find_balance(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CreditBalance",
            id: user_id,
        }))?;

    Ok(Json(DataResponse { data: balance }))
}

/// GET /api/v1/admin/users/{user_id}/transactions
pub async fn get_user_transactions(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let transactions = LedgerRepo::list_for_user(&state.pool, &user_id, limit, offset).await?;

    Ok(Json(DataResponse { data: transactions }))
}
