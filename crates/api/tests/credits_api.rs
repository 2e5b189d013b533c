//! End-to-end tests for the credit endpoints and the admin surface.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{bearer_token, body_json, build_test_app, json_request, test_config, MockProvider};

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_ok(pool: PgPool) {
    let app = build_test_app(pool, MockProvider::new(), test_config());

    let response = app
        .oneshot(json_request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

// ---------------------------------------------------------------------------
// Balance and transactions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn balance_requires_authentication(pool: PgPool) {
    let app = build_test_app(pool, MockProvider::new(), test_config());

    let response = app
        .oneshot(json_request("GET", "/api/v1/credits/balance", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_balance_read_grants_the_signup_bonus(pool: PgPool) {
    let mut config = test_config();
    config.signup_bonus_credits = 2;
    let app = build_test_app(pool, MockProvider::new(), config);
    let token = bearer_token("user-a", "a@example.com");

    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/v1/credits/balance",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["balance"], 2);
    assert_eq!(body["data"]["total_purchased"], 0);
    assert_eq!(body["data"]["total_used"], 0);

    // A second read does not grant again.
    let response = app
        .oneshot(json_request(
            "GET",
            "/api/v1/credits/balance",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["balance"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transactions_list_the_signup_bonus(pool: PgPool) {
    let app = build_test_app(pool, MockProvider::new(), test_config());
    let token = bearer_token("user-a", "a@example.com");

    // Initialize through the balance endpoint.
    app.clone()
        .oneshot(json_request(
            "GET",
            "/api/v1/credits/balance",
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/v1/credits/transactions?limit=10",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let transactions = body["data"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["type"], "signup_bonus");
    assert_eq!(transactions[0]["amount"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn packages_are_public_and_ordered(pool: PgPool) {
    let app = build_test_app(pool, MockProvider::new(), test_config());

    let response = app
        .oneshot(json_request("GET", "/api/v1/credits/packages", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let packages = body["data"].as_array().unwrap();
    assert_eq!(packages.len(), 3);
    assert_eq!(packages[0]["name"], "Starter");
    assert_eq!(packages[1]["name"], "Popular");
    assert_eq!(packages[2]["name"], "Pro");
    assert_eq!(packages[2]["credits"], 50);
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

fn adjust_body(user_id: &str, amount: i32, direction: &str) -> serde_json::Value {
    json!({
        "user_id": user_id,
        "amount": amount,
        "type": direction,
        "reason": "support ticket 42",
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn adjust_requires_an_admin(pool: PgPool) {
    let app = build_test_app(pool, MockProvider::new(), test_config());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/credits/adjust",
            None,
            Some(adjust_body("user-a", 5, "add")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = bearer_token("user-b", "not-admin@example.com");
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/credits/adjust",
            Some(&token),
            Some(adjust_body("user-a", 5, "add")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_can_add_credits(pool: PgPool) {
    let app = build_test_app(pool.clone(), MockProvider::new(), test_config());
    let admin = bearer_token("admin-1", "admin@example.com");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/credits/adjust",
            Some(&admin),
            Some(adjust_body("user-a", 5, "add")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    // Signup bonus 1 + adjustment 5.
    assert_eq!(body["data"]["new_balance"], 6);
    assert_eq!(body["data"]["performed_by"], "admin@example.com");

    // The transaction carries the structured admin actor.
    let row: (String,) = sqlx::query_as(
        "SELECT performed_by FROM credit_transactions WHERE type::TEXT = 'adjustment_add'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(row.0, "admin:admin-1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn removal_beyond_balance_is_a_bad_request(pool: PgPool) {
    let app = build_test_app(pool, MockProvider::new(), test_config());
    let admin = bearer_token("admin-1", "admin@example.com");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/credits/adjust",
            Some(&admin),
            Some(adjust_body("user-a", 10, "remove")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["current_balance"], 1);
    assert_eq!(body["requested_removal"], 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_inspects_user_balance(pool: PgPool) {
    let app = build_test_app(pool, MockProvider::new(), test_config());
    let admin = bearer_token("admin-1", "admin@example.com");

    // Unknown user: 404, no initialization side effect.
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/v1/admin/users/user-a/balance",
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Initialize the user, then inspect.
    let token = bearer_token("user-a", "a@example.com");
    app.clone()
        .oneshot(json_request(
            "GET",
            "/api/v1/credits/balance",
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/v1/admin/users/user-a/balance",
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["user_id"], "user-a");
    assert_eq!(body["data"]["balance"], 1);
}
