//! Repository for the `user_credit_balances` and `credit_transactions`
//! tables.
//!
//! This is the single source of truth for how many credits a user has.
//! Every mutation runs inside one transaction that holds a `FOR UPDATE`
//! lock on the user's balance row across the read-check-write sequence, so
//! two concurrent debits can never both pass the balance check against a
//! stale value. Contention is scoped per user; there is no global lock.
//!
//! Every successful mutation appends exactly one transaction row whose
//! `balance_after` snapshots the balance immediately after the change. A
//! call that does not return `success: true` recorded nothing.

use sqlx::PgPool;
use uuid::Uuid;

use logoloco_core::actor::Actor;

use crate::models::credit::{
    BalanceSummary, CreditBalance, CreditOptions, CreditTransaction, LedgerOutcome,
    TransactionType,
};

/// Column list for credit_transactions queries.
const TRANSACTION_COLUMNS: &str = "id, user_id, type, amount, balance_after, description, \
    polar_order_id, polar_product_id, logo_generation_id, performed_by, metadata, created_at";

/// Provides the atomic balance operations and transaction-log reads.
pub struct LedgerRepo;

impl LedgerRepo {
    // -----------------------------------------------------------------------
    // Initialization
    // -----------------------------------------------------------------------

    /// Create the user's balance row seeded with the signup bonus, if it
    /// does not exist yet. Returns `true` when this call created the row.
    ///
    /// The insert-if-absent and the bonus transaction happen in one
    /// database transaction; `ON CONFLICT DO NOTHING` on the primary key
    /// makes concurrent first-time calls safe: exactly one caller observes
    /// the insert and writes the single `signup_bonus` transaction.
    pub async fn ensure_initialized(
        pool: &PgPool,
        user_id: &str,
        signup_bonus: i32,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO user_credit_balances (user_id, balance, last_transaction_at) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(signup_bonus)
        .execute(&mut *tx)
        .await?;

        let created = inserted.rows_affected() > 0;
        if created {
            let plural = if signup_bonus == 1 { "" } else { "s" };
            sqlx::query(
                "INSERT INTO credit_transactions \
                     (user_id, type, amount, balance_after, description, performed_by) \
                 VALUES ($1, $2, $3, $3, $4, $5)",
            )
            .bind(user_id)
            .bind(TransactionType::SignupBonus)
            .bind(signup_bonus)
            .bind(format!("Welcome bonus - {signup_bonus} free credit{plural}"))
            .bind(Actor::System.as_db_value())
            .execute(&mut *tx)
            .await?;

            tracing::info!(user_id, signup_bonus, "Initialized credit balance");
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Current balance for a user, initializing them on first contact.
    pub async fn get_balance(
        pool: &PgPool,
        user_id: &str,
        signup_bonus: i32,
    ) -> Result<i32, sqlx::Error> {
        Self::ensure_initialized(pool, user_id, signup_bonus).await?;

        let row: (i32,) =
            sqlx::query_as("SELECT balance FROM user_credit_balances WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Balance plus lifetime counters, initializing the user on first
    /// contact.
    pub async fn get_balance_summary(
        pool: &PgPool,
        user_id: &str,
        signup_bonus: i32,
    ) -> Result<BalanceSummary, sqlx::Error> {
        Self::ensure_initialized(pool, user_id, signup_bonus).await?;

        sqlx::query_as::<_, BalanceSummary>(
            "SELECT balance, total_purchased, total_used \
             FROM user_credit_balances WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Fetch the raw balance row without initializing. Used by the admin
    /// surface, where a missing row is a 404 rather than a signup.
    pub async fn find_balance(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Option<CreditBalance>, sqlx::Error> {
        sqlx::query_as::<_, CreditBalance>(
            "SELECT user_id, balance, total_purchased, total_used, last_transaction_at, \
                    created_at, updated_at \
             FROM user_credit_balances WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Debit credits for a generation.
    ///
    /// Re-reads the balance under a row lock, fails without mutating when
    /// the balance is insufficient (a normal outcome, not an error), and
    /// otherwise updates the balance, bumps `total_used`, and records a
    /// `usage` transaction with a negative amount.
    pub async fn debit(
        pool: &PgPool,
        user_id: &str,
        amount: i32,
        generation_id: Uuid,
        description: Option<&str>,
    ) -> Result<LedgerOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(i32,)> = sqlx::query_as(
            "SELECT balance FROM user_credit_balances WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((balance,)) = current else {
            return Ok(LedgerOutcome {
                success: false,
                new_balance: 0,
            });
        };
        if balance < amount {
            // Dropping the transaction rolls the lock back untouched.
            return Ok(LedgerOutcome {
                success: false,
                new_balance: balance,
            });
        }

        let new_balance = balance - amount;

        sqlx::query(
            "UPDATE user_credit_balances SET \
                 balance = $2, \
                 total_used = total_used + $3, \
                 last_transaction_at = NOW(), \
                 updated_at = NOW() \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(new_balance)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO credit_transactions \
                 (user_id, type, amount, balance_after, description, \
                  logo_generation_id, performed_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user_id)
        .bind(TransactionType::Usage)
        .bind(-amount)
        .bind(new_balance)
        .bind(description.unwrap_or("Logo generation"))
        .bind(generation_id)
        .bind(Actor::System.as_db_value())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LedgerOutcome {
            success: true,
            new_balance,
        })
    }

    /// Add credits to a user's balance.
    ///
    /// Ensures the balance row exists first, then locks, adds, and records
    /// a transaction carrying through the supplied external references and
    /// metadata. `total_purchased` grows only for `purchase` grants.
    pub async fn credit(
        pool: &PgPool,
        user_id: &str,
        amount: i32,
        transaction_type: TransactionType,
        actor: &Actor,
        options: &CreditOptions,
        signup_bonus: i32,
    ) -> Result<LedgerOutcome, sqlx::Error> {
        Self::ensure_initialized(pool, user_id, signup_bonus).await?;

        let mut tx = pool.begin().await?;

        let current: Option<(i32,)> = sqlx::query_as(
            "SELECT balance FROM user_credit_balances WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((balance,)) = current else {
            return Ok(LedgerOutcome {
                success: false,
                new_balance: 0,
            });
        };

        let new_balance = balance + amount;
        let is_purchase = transaction_type == TransactionType::Purchase;

        sqlx::query(
            "UPDATE user_credit_balances SET \
                 balance = $2, \
                 total_purchased = total_purchased + CASE WHEN $3 THEN $4 ELSE 0 END, \
                 last_transaction_at = NOW(), \
                 updated_at = NOW() \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(new_balance)
        .bind(is_purchase)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        let description = options
            .description
            .clone()
            .unwrap_or_else(|| format!("Added {amount} credits"));

        sqlx::query(
            "INSERT INTO credit_transactions \
                 (user_id, type, amount, balance_after, description, polar_order_id, \
                  polar_product_id, logo_generation_id, performed_by, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(user_id)
        .bind(transaction_type)
        .bind(amount)
        .bind(new_balance)
        .bind(description)
        .bind(&options.polar_order_id)
        .bind(&options.polar_product_id)
        .bind(options.logo_generation_id)
        .bind(actor.as_db_value())
        .bind(&options.metadata)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LedgerOutcome {
            success: true,
            new_balance,
        })
    }

    /// Apply a signed administrative adjustment.
    ///
    /// Positive deltas record `adjustment_add`; negative deltas record
    /// `adjustment_remove` and fail without mutating when they would take
    /// the balance below zero.
    pub async fn adjust(
        pool: &PgPool,
        user_id: &str,
        delta: i32,
        description: &str,
        actor: &Actor,
        metadata: Option<serde_json::Value>,
        signup_bonus: i32,
    ) -> Result<LedgerOutcome, sqlx::Error> {
        Self::ensure_initialized(pool, user_id, signup_bonus).await?;

        let mut tx = pool.begin().await?;

        let current: Option<(i32,)> = sqlx::query_as(
            "SELECT balance FROM user_credit_balances WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((balance,)) = current else {
            return Ok(LedgerOutcome {
                success: false,
                new_balance: 0,
            });
        };

        let new_balance = balance + delta;
        if new_balance < 0 {
            return Ok(LedgerOutcome {
                success: false,
                new_balance: balance,
            });
        }

        let transaction_type = if delta >= 0 {
            TransactionType::AdjustmentAdd
        } else {
            TransactionType::AdjustmentRemove
        };

        sqlx::query(
            "UPDATE user_credit_balances SET \
                 balance = $2, \
                 last_transaction_at = NOW(), \
                 updated_at = NOW() \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(new_balance)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO credit_transactions \
                 (user_id, type, amount, balance_after, description, performed_by, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user_id)
        .bind(transaction_type)
        .bind(delta)
        .bind(new_balance)
        .bind(description)
        .bind(actor.as_db_value())
        .bind(&metadata)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LedgerOutcome {
            success: true,
            new_balance,
        })
    }

    // -----------------------------------------------------------------------
    // Transaction-log reads
    // -----------------------------------------------------------------------

    /// Find a transaction by its external payment order id.
    ///
    /// This is the webhook idempotency gate: a hit means the order was
    /// already reconciled and must not be granted again.
    pub async fn find_by_order_id(
        pool: &PgPool,
        order_id: &str,
    ) -> Result<Option<CreditTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM credit_transactions \
             WHERE polar_order_id = $1 LIMIT 1"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(order_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a refund transaction already references this generation.
    ///
    /// Guards the poll path so repeated polls of a failed generation can
    /// never refund twice.
    pub async fn has_refund_for_generation(
        pool: &PgPool,
        generation_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS( \
                 SELECT 1 FROM credit_transactions \
                 WHERE logo_generation_id = $1 AND type = $2)",
        )
        .bind(generation_id)
        .bind(TransactionType::Refund)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// List a user's transactions, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreditTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM credit_transactions \
             WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
