//! Generation record models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use logoloco_core::types::Timestamp;

/// A generation lifecycle record from the `logo_generations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Generation {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub app_name: String,
    pub app_focus: String,
    pub color1: String,
    pub color2: String,
    /// Provider model identifier, not the client-facing short name.
    pub model: String,
    pub output_count: i32,
    pub credits_charged: i32,
    pub prompt: String,
    pub status: String,
    pub provider_prediction_id: Option<String>,
    pub images: Json<Vec<String>>,
    pub provider_response: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a new generation record.
///
/// Records are always created in `running` status; the status moves forward
/// from there and never regresses out of a terminal state.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGeneration {
    pub user_id: Option<String>,
    pub app_name: String,
    pub app_focus: String,
    pub color1: String,
    pub color2: String,
    pub model: String,
    pub output_count: i32,
    pub credits_charged: i32,
    pub prompt: String,
}

/// Pagination envelope for the history listing.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationPage {
    pub generations: Vec<Generation>,
    pub pagination: PageInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
    pub has_more: bool,
}
