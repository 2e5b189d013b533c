//! The generation lifecycle coordinator: charge, submit, reconcile, refund.
//!
//! Create protocol ordering is load-bearing. The record is persisted before
//! the debit, and the debit before the provider call, so every failure mode
//! leaves either no charge or a charged-and-refundable record, never a
//! charge without a trail:
//!
//! 1. validate the request payload
//! 2. non-authoritative balance pre-check (cheap rejection, no side effects)
//! 3. create the record in `running` status
//! 4. authoritative debit under a row lock
//! 5. provider submit; any failure marks the record `failed` and refunds
//!
//! A debit that loses the race against a concurrent spend closes the record
//! out as `failed` immediately instead of leaving an uncharged `running`
//! orphan. The status-poll path refunds exactly once when it discovers a
//! transition into `failed`, guarded by the ledger's refund lookup, so a
//! generation that fails after submission costs nothing either.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use logoloco_core::actor::Actor;
use logoloco_core::error::CoreError;
use logoloco_core::generation::{
    build_prompt, clamp_output_count, credits_required, provider_model_id,
    validate_generation_request,
};
use logoloco_core::status::GenerationStatus;
use logoloco_db::models::credit::{CreditOptions, TransactionType};
use logoloco_db::models::generation::{CreateGeneration, Generation, GenerationPage, PageInfo};
use logoloco_db::repositories::{GenerationRepo, LedgerRepo};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /generations`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGenerationRequest {
    pub app_name: String,
    pub app_focus: String,
    pub color1: String,
    pub color2: String,
    pub model: String,
    pub output_count: Option<i32>,
}

/// Successful create response.
#[derive(Debug, Serialize)]
pub struct CreateGenerationOutcome {
    pub prediction_id: String,
    pub generation_id: Uuid,
    pub status: GenerationStatus,
    pub images: Vec<String>,
    pub credits_charged: i32,
    pub balance: i32,
    /// The provider's raw accept payload.
    pub prediction: serde_json::Value,
}

/// Successful status-poll response.
#[derive(Debug, Serialize)]
pub struct PollOutcome {
    pub prediction_id: String,
    pub status: GenerationStatus,
    pub images: Vec<String>,
    /// The provider's raw status payload.
    pub prediction: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Create protocol
// ---------------------------------------------------------------------------

/// Run the create-generation protocol for an authenticated user.
pub async fn create_generation(
    state: &AppState,
    user: &AuthUser,
    request: CreateGenerationRequest,
) -> Result<CreateGenerationOutcome, AppError> {
    validate_generation_request(
        &request.app_name,
        &request.app_focus,
        &request.color1,
        &request.color2,
        &request.model,
    )?;

    let output_count = clamp_output_count(request.output_count);
    let credits = credits_required(output_count);
    let bonus = state.config.signup_bonus_credits;

    // Non-authoritative pre-check: rejects the common case before any row
    // is written. The locked debit below is the authoritative check.
    let balance = LedgerRepo::get_balance(&state.pool, &user.user_id, bonus).await?;
    if balance < credits {
        return Err(CoreError::InsufficientCredits {
            balance,
            required: credits,
        }
        .into());
    }

    let model = provider_model_id(&request.model).ok_or_else(|| {
        AppError::InternalError("Model passed validation but has no provider id".into())
    })?;
    let prompt = build_prompt(
        &request.app_name,
        &request.app_focus,
        &request.color1,
        &request.color2,
    );

    let record = GenerationRepo::create(
        &state.pool,
        &CreateGeneration {
            user_id: Some(user.user_id.clone()),
            app_name: request.app_name.clone(),
            app_focus: request.app_focus.clone(),
            color1: request.color1.clone(),
            color2: request.color2.clone(),
            model: model.to_string(),
            output_count,
            credits_charged: credits,
            prompt: prompt.clone(),
        },
    )
    .await?;

    let debit = LedgerRepo::debit(&state.pool, &user.user_id, credits, record.id, None).await?;
    if !debit.success {
        // Lost the race against a concurrent spend. Nothing was charged;
        // close the record out instead of leaving an uncharged `running`
        // orphan with no corrective path.
        if let Err(err) = GenerationRepo::mark_failed(
            &state.pool,
            record.id,
            "Insufficient credits at charge time",
        )
        .await
        {
            tracing::error!(
                generation_id = %record.id,
                error = %err,
                "Failed to close out uncharged generation record",
            );
        }
        return Err(CoreError::InsufficientCredits {
            balance: debit.new_balance,
            required: credits,
        }
        .into());
    }

    tracing::info!(
        generation_id = %record.id,
        user_id = %user.user_id,
        credits,
        "Charged generation",
    );

    let submission = match state.provider.submit(model, &prompt, output_count).await {
        Ok(submission) => submission,
        Err(err) => {
            // The debit is durable at this point, so the refund must happen
            // even though the failure was discovered afterwards.
            fail_and_refund(state, &record, &err.to_string()).await;
            return Err(err.into());
        }
    };

    let prediction_id = submission
        .prediction_id
        .clone()
        .unwrap_or_else(|| record.id.to_string());

    if let Err(err) = GenerationRepo::mark_submitted(
        &state.pool,
        record.id,
        &prediction_id,
        submission.status,
        &submission.images,
        &submission.raw,
    )
    .await
    {
        // The prediction is in flight but we lost track of it. Refund so
        // the user is never charged for output we cannot attribute.
        fail_and_refund(state, &record, "Internal server error").await;
        return Err(err.into());
    }

    Ok(CreateGenerationOutcome {
        prediction_id,
        generation_id: record.id,
        status: submission.status,
        images: submission.images,
        credits_charged: credits,
        balance: debit.new_balance,
        prediction: submission.raw,
    })
}

// ---------------------------------------------------------------------------
// Status-poll protocol
// ---------------------------------------------------------------------------

/// Poll the provider for a generation's current status and reconcile the
/// record with the answer.
pub async fn poll_generation(
    state: &AppState,
    user: &AuthUser,
    prediction_id: &str,
) -> Result<PollOutcome, AppError> {
    let record = GenerationRepo::find_by_provider_id(&state.pool, prediction_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Generation",
            id: prediction_id.to_string(),
        })?;

    if record.user_id.as_deref() != Some(user.user_id.as_str()) {
        return Err(CoreError::Forbidden("Generation belongs to another user".into()).into());
    }

    // A gateway error surfaces to the caller without touching the record;
    // the client simply polls again.
    let result = state.provider.fetch_status(prediction_id).await?;

    let updated = GenerationRepo::sync_from_provider(
        &state.pool,
        prediction_id,
        result.status,
        &result.images,
        &result.raw,
    )
    .await?;

    // `sync_from_provider` only returns a row when it moved a non-terminal
    // record, so `failed` here is always the transition *into* failure.
    // Records reach `running` only after a successful debit, so the charge
    // is known to exist; the refund lookup still guards against a repeat.
    if let Some(updated) = &updated {
        if result.status == GenerationStatus::Failed && updated.credits_charged > 0 {
            refund_once(state, updated).await;
        }
    }

    Ok(PollOutcome {
        prediction_id: prediction_id.to_string(),
        status: result.status,
        images: result.images,
        prediction: result.raw,
    })
}

// ---------------------------------------------------------------------------
// History listing
// ---------------------------------------------------------------------------

/// List the authenticated user's generations, newest first, within the
/// configured retention window.
pub async fn list_history(
    state: &AppState,
    user: &AuthUser,
    status: Option<String>,
    limit: i64,
    offset: i64,
) -> Result<GenerationPage, AppError> {
    if let Some(status) = status.as_deref() {
        if GenerationStatus::parse(status).is_none() {
            return Err(CoreError::Validation(format!("Invalid status filter '{status}'")).into());
        }
    }

    let retention = state.config.history_retention_days;
    let generations = GenerationRepo::list_for_user(
        &state.pool,
        &user.user_id,
        status.as_deref(),
        limit,
        offset,
        retention,
    )
    .await?;
    let total =
        GenerationRepo::count_for_user(&state.pool, &user.user_id, status.as_deref(), retention)
            .await?;

    let returned = generations.len() as i64;
    Ok(GenerationPage {
        generations,
        pagination: PageInfo {
            limit,
            offset,
            total,
            has_more: offset + returned < total,
        },
    })
}

// ---------------------------------------------------------------------------
// Refund helpers
// ---------------------------------------------------------------------------

/// Best-effort cleanup after a provider-facing failure: mark the record
/// failed and refund the charge. Secondary failures are logged and never
/// mask the primary error.
async fn fail_and_refund(state: &AppState, record: &Generation, error: &str) {
    if let Err(err) = GenerationRepo::mark_failed(&state.pool, record.id, error).await {
        tracing::error!(
            generation_id = %record.id,
            error = %err,
            "Failed to update generation status",
        );
    }
    refund_once(state, record).await;
}

/// Refund a generation's charge unless a refund already references it.
async fn refund_once(state: &AppState, record: &Generation) {
    match LedgerRepo::has_refund_for_generation(&state.pool, record.id).await {
        Ok(true) => return,
        Ok(false) => {}
        Err(err) => {
            tracing::error!(
                generation_id = %record.id,
                error = %err,
                "Failed to check for existing refund",
            );
            return;
        }
    }

    let Some(user_id) = record.user_id.as_deref() else {
        return;
    };

    let options = CreditOptions {
        logo_generation_id: Some(record.id),
        description: Some("Refund for failed generation".to_string()),
        ..Default::default()
    };
    match LedgerRepo::credit(
        &state.pool,
        user_id,
        record.credits_charged,
        TransactionType::Refund,
        &Actor::System,
        &options,
        state.config.signup_bonus_credits,
    )
    .await
    {
        Ok(outcome) if outcome.success => {
            tracing::info!(
                generation_id = %record.id,
                amount = record.credits_charged,
                new_balance = outcome.new_balance,
                "Refunded failed generation",
            );
        }
        Ok(_) => {
            tracing::error!(generation_id = %record.id, "Refund did not apply");
        }
        Err(err) => {
            tracing::error!(
                generation_id = %record.id,
                error = %err,
                "Failed to refund generation",
            );
        }
    }
}
