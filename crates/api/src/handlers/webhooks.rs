//! The payment webhook reconciler.
//!
//! Route:
//! - `POST /webhooks/polar` — turn one payment event into a credit grant,
//!   exactly once, despite at-least-once delivery.
//!
//! The processor retries deliveries until it sees a 2xx, so every accepted
//! outcome (processed, already processed, unrecognized event type) answers
//! 200. Signature failures answer 401; events that cannot be resolved to an
//! amount or a user answer 400 and are reconciled manually.
//!
//! Response shapes here are part of the processor-facing contract and are
//! built ad hoc rather than through the `{ "data": ... }` envelope.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use logoloco_core::actor::Actor;
use logoloco_core::billing::{self, PaymentEvent};
use logoloco_core::error::CoreError;
use logoloco_db::models::credit::{CreditOptions, TransactionType};
use logoloco_db::repositories::{CreditPackageRepo, LedgerRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/webhooks/polar
pub async fn polar_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    // The signature covers the exact bytes received; `body` must not be
    // re-serialized before verification.
    if let Some(secret) = &state.config.polar_webhook_secret {
        let header = headers
            .get("webhook-signature")
            .or_else(|| headers.get("x-polar-signature"))
            .and_then(|v| v.to_str().ok());

        let verified = header
            .map(|h| billing::verify_webhook_signature(&body, h, secret))
            .unwrap_or(false);
        if !verified {
            tracing::warn!("Webhook signature verification failed");
            return Err(CoreError::Unauthorized("Invalid signature".into()).into());
        }
    } else {
        tracing::warn!("POLAR_WEBHOOK_SECRET not set - skipping signature verification");
    }

    let event: PaymentEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    if !event.grants_credits() {
        // Acknowledged but no side effect.
        return Ok(Json(json!({ "received": true, "type": event.event_type })).into_response());
    }

    handle_completed_order(&state, event).await
}

/// Grant credits for a completed order event.
async fn handle_completed_order(state: &AppState, event: PaymentEvent) -> AppResult<Response> {
    let data = event.data;

    let Some(order_id) = data.id.clone() else {
        return Err(AppError::BadRequest("Missing order ID".into()));
    };

    // Idempotency gate: the order id is the dedup key for at-least-once
    // delivery. Checked before any grant.
    if LedgerRepo::find_by_order_id(&state.pool, &order_id)
        .await?
        .is_some()
    {
        tracing::info!(order_id = %order_id, "Webhook order already processed");
        return Ok(
            Json(json!({ "received": true, "status": "already_processed" })).into_response(),
        );
    }

    // Resolve the credit amount: catalog package first, then the
    // one-credit-per-dollar fallback.
    let product_id = data.resolve_product_id();
    let mut credits = 0;
    let mut package_name = "Credit Package".to_string();
    if let Some(product_id) = product_id.as_deref() {
        if let Some(package) = CreditPackageRepo::find_by_product_id(&state.pool, product_id).await?
        {
            credits = package.credits;
            package_name = package.name;
        }
    }
    if credits == 0 {
        if let Some(amount) = data.amount {
            credits = billing::credits_from_amount(amount);
        }
    }
    if credits == 0 {
        tracing::error!(order_id = %order_id, "Could not determine credit amount");
        return Err(AppError::BadRequest("Could not determine credit amount".into()));
    }

    let customer_email = data.resolve_customer_email();
    let Some(user_id) = data.resolve_user_id() else {
        // No account to credit. Report the amount so an operator can link
        // the order manually; the processor must not retry forever.
        tracing::error!(order_id = %order_id, "Webhook order has no resolvable user");
        let body = json!({
            "error": "Missing user ID",
            "order_id": order_id,
            "customer_email": customer_email,
            "credits": credits,
            "status": "pending_user_link",
        });
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    };

    let options = CreditOptions {
        polar_order_id: Some(order_id.clone()),
        polar_product_id: product_id,
        description: Some(format!("Purchased {package_name} ({credits} credits)")),
        metadata: Some(json!({
            "customerEmail": customer_email,
            "amount": data.amount,
            "currency": data.currency,
        })),
        ..Default::default()
    };

    let outcome = LedgerRepo::credit(
        &state.pool,
        &user_id,
        credits,
        TransactionType::Purchase,
        &Actor::Webhook,
        &options,
        state.config.signup_bonus_credits,
    )
    .await?;

    if !outcome.success {
        return Err(AppError::InternalError(format!(
            "Failed to add credits for order {order_id}"
        )));
    }

    tracing::info!(
        order_id = %order_id,
        user_id = %user_id,
        credits,
        new_balance = outcome.new_balance,
        "Webhook credits granted",
    );

    Ok(Json(json!({
        "received": true,
        "status": "processed",
        "credits": credits,
        "new_balance": outcome.new_balance,
    }))
    .into_response())
}

// ---------------------------------------------------------------------------
// Development-only manual grant
// ---------------------------------------------------------------------------

#[cfg(debug_assertions)]
#[derive(Debug, serde::Deserialize)]
pub struct TestGrantRequest {
    pub user_id: String,
    pub credits: i32,
    pub description: Option<String>,
}

/// POST /api/v1/webhooks/polar/test (debug builds only)
///
/// Manual credit grant for local development.
#[cfg(debug_assertions)]
pub async fn test_grant(
    State(state): State<AppState>,
    Json(request): Json<TestGrantRequest>,
) -> AppResult<Response> {
    if request.user_id.is_empty() || request.credits <= 0 {
        return Err(AppError::BadRequest(
            "user_id and a positive credits value are required".into(),
        ));
    }

    let options = CreditOptions {
        description: Some(
            request
                .description
                .unwrap_or_else(|| "Test credit addition".to_string()),
        ),
        ..Default::default()
    };
    let outcome = LedgerRepo::credit(
        &state.pool,
        &request.user_id,
        request.credits,
        TransactionType::AdjustmentAdd,
        &Actor::System,
        &options,
        state.config.signup_bonus_credits,
    )
    .await?;

    Ok(Json(json!({
        "success": outcome.success,
        "new_balance": outcome.new_balance,
    }))
    .into_response())
}
