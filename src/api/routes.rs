//! Route table for the JSON API.

use axum::routing::{get, post, put};
use axum::Router;

use crate::server::AppState;

use super::handlers;

/// Build the full API surface.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        // Accounts
        .route(
            "/api/users/me",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/users", get(handlers::list_accounts))
        .route(
            "/api/users/:id",
            get(handlers::get_account)
                .put(handlers::update_account)
                .delete(handlers::delete_account),
        )
        // Traders
        .route(
            "/api/traders",
            get(handlers::list_traders).post(handlers::create_trader),
        )
        .route("/api/traders/all", get(handlers::list_all_traders))
        .route(
            "/api/traders/:id",
            get(handlers::get_trader)
                .put(handlers::update_trader)
                .delete(handlers::delete_trader),
        )
        // Copy trading
        .route("/api/copy/start", post(handlers::copy_start))
        .route("/api/copy/stop", post(handlers::copy_stop))
        // Ledger
        .route("/api/transactions/deposit", post(handlers::deposit))
        .route("/api/transactions/withdraw", post(handlers::withdraw))
        .route("/api/transactions/purchase", post(handlers::purchase))
        .route("/api/transactions/service", post(handlers::service_purchase))
        .route("/api/transactions/me", get(handlers::my_transactions))
        .route("/api/transactions", get(handlers::list_transactions))
        .route("/api/transactions/status", put(handlers::update_status))
        .route("/api/transactions/inject", post(handlers::inject_entry))
        .route("/api/transactions/profit", post(handlers::topup_profit))
        // Chat & contact
        .route("/api/chat/history/:room", get(handlers::chat_history))
        .route("/api/chat/message", post(handlers::post_chat_message))
        .route("/api/contact", post(handlers::submit_contact))
        // Keep-alive probe
        .route("/ping", get(handlers::ping))
}
