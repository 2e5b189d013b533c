//! Repository for the `credit_packages` catalog.
//!
//! Read-only at runtime; rows are managed by migrations or operators.

use sqlx::PgPool;

use crate::models::credit::CreditPackage;

const COLUMNS: &str = "id, name, credits, price_in_cents, polar_product_id, is_active, \
    sort_order, metadata, created_at, updated_at";

pub struct CreditPackageRepo;

impl CreditPackageRepo {
    /// List active packages in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<CreditPackage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM credit_packages \
             WHERE is_active = TRUE \
             ORDER BY sort_order"
        );
        sqlx::query_as::<_, CreditPackage>(&query)
            .fetch_all(pool)
            .await
    }

    /// Resolve a package by the payment processor's product id.
    pub async fn find_by_product_id(
        pool: &PgPool,
        product_id: &str,
    ) -> Result<Option<CreditPackage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM credit_packages \
             WHERE polar_product_id = $1 LIMIT 1"
        );
        sqlx::query_as::<_, CreditPackage>(&query)
            .bind(product_id)
            .fetch_optional(pool)
            .await
    }
}
