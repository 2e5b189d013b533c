//! Credit ledger models and DTOs.
//!
//! Defines the row structs for `user_credit_balances`, `credit_transactions`
//! and `credit_packages`, the transaction type enum, and the option/outcome
//! types used by the ledger repository.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use logoloco_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Transaction type
// ---------------------------------------------------------------------------

/// Credit transaction type, matching the `credit_transaction_type` database
/// enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "credit_transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    SignupBonus,
    Purchase,
    Usage,
    Refund,
    AdjustmentAdd,
    AdjustmentRemove,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A user's balance row from `user_credit_balances`.
///
/// Mutated only through [`crate::repositories::LedgerRepo`]; never deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditBalance {
    pub user_id: String,
    pub balance: i32,
    pub total_purchased: i32,
    pub total_used: i32,
    pub last_transaction_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An immutable row from the append-only `credit_transactions` log.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditTransaction {
    pub id: Uuid,
    pub user_id: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Signed: positive for credits added, negative for usage.
    pub amount: i32,
    /// Balance snapshot immediately after this transaction was applied.
    pub balance_after: i32,
    pub description: Option<String>,
    pub polar_order_id: Option<String>,
    pub polar_product_id: Option<String>,
    pub logo_generation_id: Option<Uuid>,
    pub performed_by: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// A purchasable credit package from the catalog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditPackage {
    pub id: Uuid,
    pub name: String,
    pub credits: i32,
    pub price_in_cents: i32,
    pub polar_product_id: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Repository inputs / outputs
// ---------------------------------------------------------------------------

/// Optional references and context attached to a credit grant.
#[derive(Debug, Clone, Default)]
pub struct CreditOptions {
    pub polar_order_id: Option<String>,
    pub polar_product_id: Option<String>,
    pub logo_generation_id: Option<Uuid>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Result of a debit, credit, or adjustment attempt.
///
/// `success: false` means the balance was left untouched and no transaction
/// was recorded.
#[derive(Debug, Clone, Copy)]
pub struct LedgerOutcome {
    pub success: bool,
    pub new_balance: i32,
}

/// The balance endpoint's response shape.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BalanceSummary {
    pub balance: i32,
    pub total_purchased: i32,
    pub total_used: i32,
}
