//! Handlers for the credit endpoints.
//!
//! Routes:
//! - `GET /credits/balance`       — balance + lifetime counters
//! - `GET /credits/transactions`  — paginated transaction history
//! - `GET /credits/packages`      — active catalog (public)

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use logoloco_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use logoloco_db::repositories::{CreditPackageRepo, LedgerRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/credits/balance
///
/// Returns the authenticated user's balance, initializing a brand-new user
/// with the signup bonus on first contact.
pub async fn get_balance(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let summary = LedgerRepo::get_balance_summary(
        &state.pool,
        &user.user_id,
        state.config.signup_bonus_credits,
    )
    .await?;

    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/credits/transactions
///
/// The authenticated user's transaction history, newest first.
pub async fn list_transactions(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let transactions =
        LedgerRepo::list_for_user(&state.pool, &user.user_id, limit, offset).await?;

    Ok(Json(DataResponse { data: transactions }))
}

/// GET /api/v1/credits/packages
///
/// Active credit packages in display order. Public: the pricing page shows
/// these before login, and the client needs each package's external product
/// id to start a checkout.
pub async fn list_packages(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let packages = CreditPackageRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: packages }))
}
