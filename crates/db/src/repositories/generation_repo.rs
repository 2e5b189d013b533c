//! Repository for the `logo_generations` table.
//!
//! Only the orchestrator's create path and the status-poll path write to a
//! given record, and both only move status forward. The provider-sync
//! update refuses to touch records already in a terminal status, so a late
//! or repeated poll can never regress `succeeded`/`failed`.

use sqlx::types::Json;
use sqlx::PgPool;

use logoloco_core::status::GenerationStatus;
use logoloco_core::types::GenerationId;

use crate::models::generation::{CreateGeneration, Generation};

/// Column list for logo_generations queries.
const COLUMNS: &str = "id, user_id, app_name, app_focus, color1, color2, model, \
    output_count, credits_charged, prompt, status, provider_prediction_id, images, \
    provider_response, error, created_at, updated_at";

/// Provides lifecycle operations for generation records.
pub struct GenerationRepo;

impl GenerationRepo {
    /// Insert a new record in `running` status, returning the created row.
    ///
    /// The record is persisted before any credits move so a crash later in
    /// the flow always leaves a traceable, refundable trail.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGeneration,
    ) -> Result<Generation, sqlx::Error> {
        let query = format!(
            "INSERT INTO logo_generations \
                 (user_id, app_name, app_focus, color1, color2, model, \
                  output_count, credits_charged, prompt, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'running') \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(&input.user_id)
            .bind(&input.app_name)
            .bind(&input.app_focus)
            .bind(&input.color1)
            .bind(&input.color2)
            .bind(&input.model)
            .bind(input.output_count)
            .bind(input.credits_charged)
            .bind(&input.prompt)
            .fetch_one(pool)
            .await
    }

    /// Find a record by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: GenerationId,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM logo_generations WHERE id = $1");
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a record by the provider's correlation id.
    pub async fn find_by_provider_id(
        pool: &PgPool,
        provider_prediction_id: &str,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM logo_generations WHERE provider_prediction_id = $1"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(provider_prediction_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a record failed with an explanatory error message.
    /// Returns `true` if a row was updated.
    pub async fn mark_failed(
        pool: &PgPool,
        id: GenerationId,
        error: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE logo_generations SET \
                 status = 'failed', \
                 error = $2, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the provider's accept response on a freshly created record:
    /// correlation id, initial status, and any images already available.
    pub async fn mark_submitted(
        pool: &PgPool,
        id: GenerationId,
        provider_prediction_id: &str,
        status: GenerationStatus,
        images: &[String],
        provider_response: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE logo_generations SET \
                 status = $2, \
                 provider_prediction_id = $3, \
                 images = $4, \
                 provider_response = $5, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(provider_prediction_id)
        .bind(Json(images))
        .bind(provider_response)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a status poll result to the record owning this correlation id.
    ///
    /// Returns the updated row, or `None` when no row matched: either the
    /// id is unknown or the record is already terminal. A `Some` whose
    /// status is `failed` therefore always marks the transition *into*
    /// failure, which is what the poll path's refund check keys on.
    pub async fn sync_from_provider(
        pool: &PgPool,
        provider_prediction_id: &str,
        status: GenerationStatus,
        images: &[String],
        provider_response: &serde_json::Value,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE logo_generations SET \
                 status = $2, \
                 images = $3, \
                 provider_response = $4, \
                 updated_at = NOW() \
             WHERE provider_prediction_id = $1 \
               AND status NOT IN ('succeeded', 'failed') \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(provider_prediction_id)
            .bind(status.as_str())
            .bind(Json(images))
            .bind(provider_response)
            .fetch_optional(pool)
            .await
    }

    /// List a user's generations, newest first, optionally filtered by
    /// status and bounded by the retention window. Records older than the
    /// window are excluded from listings but never deleted.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
        status: Option<&str>,
        limit: i64,
        offset: i64,
        retention_days: i64,
    ) -> Result<Vec<Generation>, sqlx::Error> {
        if let Some(status) = status {
            let query = format!(
                "SELECT {COLUMNS} FROM logo_generations \
                 WHERE user_id = $1 AND status = $2 \
                   AND created_at > NOW() - ($3 || ' days')::INTERVAL \
                 ORDER BY created_at DESC LIMIT $4 OFFSET $5"
            );
            sqlx::query_as::<_, Generation>(&query)
                .bind(user_id)
                .bind(status)
                .bind(retention_days.to_string())
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        } else {
            let query = format!(
                "SELECT {COLUMNS} FROM logo_generations \
                 WHERE user_id = $1 \
                   AND created_at > NOW() - ($2 || ' days')::INTERVAL \
                 ORDER BY created_at DESC LIMIT $3 OFFSET $4"
            );
            sqlx::query_as::<_, Generation>(&query)
                .bind(user_id)
                .bind(retention_days.to_string())
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
    }

    /// Count the rows the listing above would page over.
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: &str,
        status: Option<&str>,
        retention_days: i64,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = if let Some(status) = status {
            sqlx::query_as(
                "SELECT COUNT(*) FROM logo_generations \
                 WHERE user_id = $1 AND status = $2 \
                   AND created_at > NOW() - ($3 || ' days')::INTERVAL",
            )
            .bind(user_id)
            .bind(status)
            .bind(retention_days.to_string())
            .fetch_one(pool)
            .await?
        } else {
            sqlx::query_as(
                "SELECT COUNT(*) FROM logo_generations \
                 WHERE user_id = $1 \
                   AND created_at > NOW() - ($2 || ' days')::INTERVAL",
            )
            .bind(user_id)
            .bind(retention_days.to_string())
            .fetch_one(pool)
            .await?
        };
        Ok(row.0)
    }
}
