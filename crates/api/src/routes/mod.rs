//! Route definitions.
//!
//! Route hierarchy under `/api/v1`:
//!
//! ```text
//! /credits/balance                      balance + counters (auth)
//! /credits/transactions                 transaction history (auth)
//! /credits/packages                     active catalog (public)
//!
//! /generations                          create (POST), history (GET)
//! /generations/{prediction_id}          status poll (GET)
//!
//! /webhooks/polar                       payment webhook (signature gated)
//! /webhooks/polar/test                  manual grant (debug builds only)
//!
//! /admin/credits/adjust                 manual adjustment (admin only)
//! /admin/users/{user_id}/balance        inspect balance (admin only)
//! /admin/users/{user_id}/transactions   inspect transactions (admin only)
//! ```

pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, credits, generations, webhooks};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/credits", credits_routes())
        .nest("/generations", generation_routes())
        .nest("/webhooks", webhook_routes())
        .nest("/admin", admin_routes())
}

fn credits_routes() -> Router<AppState> {
    Router::new()
        .route("/balance", get(credits::get_balance))
        .route("/transactions", get(credits::list_transactions))
        .route("/packages", get(credits::list_packages))
}

fn generation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(generations::create_generation).get(generations::list_generations),
        )
        .route("/{prediction_id}", get(generations::poll_generation))
}

fn webhook_routes() -> Router<AppState> {
    let router = Router::new().route("/polar", post(webhooks::polar_webhook));
    #[cfg(debug_assertions)]
    let router = router.route("/polar/test", post(webhooks::test_grant));
    router
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/credits/adjust", post(admin::adjust_credits))
        .route("/users/{user_id}/balance", get(admin::get_user_balance))
        .route(
            "/users/{user_id}/transactions",
            get(admin::get_user_transactions),
        )
}
