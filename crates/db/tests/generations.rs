//! Integration tests for the generation record store.
//!
//! Verifies creation in `running` status, the provider-sync guard that
//! keeps terminal statuses from regressing, and the retention-bounded
//! history listing.

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use logoloco_core::status::GenerationStatus;
use logoloco_db::models::generation::CreateGeneration;
use logoloco_db::repositories::GenerationRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_generation(user_id: &str) -> CreateGeneration {
    CreateGeneration {
        user_id: Some(user_id.to_string()),
        app_name: "Notes".to_string(),
        app_focus: "note taking".to_string(),
        color1: "#112233".to_string(),
        color2: "#445566".to_string(),
        model: "nano-banana".to_string(),
        output_count: 2,
        credits_charged: 2,
        prompt: "an icon".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_starts_in_running_status(pool: PgPool) {
    let record = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();

    assert_eq!(record.status, "running");
    assert_eq!(record.credits_charged, 2);
    assert!(record.images.0.is_empty());
    assert!(record.provider_prediction_id.is_none());

    let found = GenerationRepo::find_by_id(&pool, record.id)
        .await
        .unwrap()
        .expect("record should be found by id");
    assert_eq!(found.id, record.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_submitted_links_provider_id(pool: PgPool) {
    let record = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();

    let raw = json!({"id": "pred-1", "status": "running"});
    let updated = GenerationRepo::mark_submitted(
        &pool,
        record.id,
        "pred-1",
        GenerationStatus::Running,
        &[],
        &raw,
    )
    .await
    .unwrap();
    assert!(updated);

    let found = GenerationRepo::find_by_provider_id(&pool, "pred-1")
        .await
        .unwrap()
        .expect("record should be found by provider id");
    assert_eq!(found.id, record.id);
    assert_eq!(found.status, "running");
    assert!(found.provider_response.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_failed_records_the_error(pool: PgPool) {
    let record = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();

    let updated = GenerationRepo::mark_failed(&pool, record.id, "Failed to reach provider")
        .await
        .unwrap();
    assert!(updated);

    let found = GenerationRepo::find_by_id(&pool, record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.status, "failed");
    assert_eq!(found.error.as_deref(), Some("Failed to reach provider"));
}

// ---------------------------------------------------------------------------
// Provider sync
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sync_moves_running_to_succeeded(pool: PgPool) {
    let record = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();
    GenerationRepo::mark_submitted(
        &pool,
        record.id,
        "pred-1",
        GenerationStatus::Running,
        &[],
        &json!({"id": "pred-1"}),
    )
    .await
    .unwrap();

    let images = vec!["https://cdn.example/a.png".to_string()];
    let updated = GenerationRepo::sync_from_provider(
        &pool,
        "pred-1",
        GenerationStatus::Succeeded,
        &images,
        &json!({"id": "pred-1", "status": "success"}),
    )
    .await
    .unwrap()
    .expect("sync should update the running record");

    assert_eq!(updated.status, "succeeded");
    assert_eq!(updated.images.0, images);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sync_never_regresses_a_terminal_status(pool: PgPool) {
    let record = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();
    GenerationRepo::mark_submitted(
        &pool,
        record.id,
        "pred-1",
        GenerationStatus::Succeeded,
        &["a.png".to_string()],
        &json!({"id": "pred-1", "status": "success"}),
    )
    .await
    .unwrap();

    // A late poll reporting `running` (or anything else) must not touch
    // the settled record.
    let result = GenerationRepo::sync_from_provider(
        &pool,
        "pred-1",
        GenerationStatus::Running,
        &[],
        &json!({"id": "pred-1", "status": "running"}),
    )
    .await
    .unwrap();
    assert!(result.is_none());

    let found = GenerationRepo::find_by_provider_id(&pool, "pred-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.status, "succeeded");
    assert_eq!(found.images.0, vec!["a.png".to_string()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sync_with_unknown_provider_id_is_a_noop(pool: PgPool) {
    let result = GenerationRepo::sync_from_provider(
        &pool,
        "pred-unknown",
        GenerationStatus::Succeeded,
        &[],
        &json!({}),
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// History listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_is_user_scoped_and_newest_first(pool: PgPool) {
    let first = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();
    let second = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();
    GenerationRepo::create(&pool, &new_generation("user-b"))
        .await
        .unwrap();

    // Force a stable ordering between the two rows.
    sqlx::query("UPDATE logo_generations SET created_at = created_at - INTERVAL '1 minute' WHERE id = $1")
        .bind(first.id)
        .execute(&pool)
        .await
        .unwrap();

    let listed = GenerationRepo::list_for_user(&pool, "user-a", None, 10, 0, 90)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);

    let count = GenerationRepo::count_for_user(&pool, "user-a", None, 90)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_filters_by_status(pool: PgPool) {
    let record = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();
    GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();
    GenerationRepo::mark_failed(&pool, record.id, "boom").await.unwrap();

    let failed = GenerationRepo::list_for_user(&pool, "user-a", Some("failed"), 10, 0, 90)
        .await
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, record.id);

    let running = GenerationRepo::list_for_user(&pool, "user-a", Some("running"), 10, 0, 90)
        .await
        .unwrap();
    assert_eq!(running.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn retention_window_hides_but_keeps_old_records(pool: PgPool) {
    let old = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();
    let recent = GenerationRepo::create(&pool, &new_generation("user-a"))
        .await
        .unwrap();

    sqlx::query("UPDATE logo_generations SET created_at = NOW() - INTERVAL '400 days' WHERE id = $1")
        .bind(old.id)
        .execute(&pool)
        .await
        .unwrap();

    let listed = GenerationRepo::list_for_user(&pool, "user-a", None, 10, 0, 90)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, recent.id);

    let count = GenerationRepo::count_for_user(&pool, "user-a", None, 90)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Excluded from listings, never deleted.
    assert!(GenerationRepo::find_by_id(&pool, old.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pagination_pages_through_results(pool: PgPool) {
    for _ in 0..3 {
        GenerationRepo::create(&pool, &new_generation("user-a"))
            .await
            .unwrap();
    }

    let page_one = GenerationRepo::list_for_user(&pool, "user-a", None, 2, 0, 90)
        .await
        .unwrap();
    assert_eq!(page_one.len(), 2);

    let page_two = GenerationRepo::list_for_user(&pool, "user-a", None, 2, 2, 90)
        .await
        .unwrap();
    assert_eq!(page_two.len(), 1);

    let seen: std::collections::HashSet<Uuid> = page_one
        .iter()
        .chain(page_two.iter())
        .map(|g| g.id)
        .collect();
    assert_eq!(seen.len(), 3);
}
