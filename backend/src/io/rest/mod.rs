//! # REST API Interface Layer
//!
//! HTTP endpoints for accounts, rooms, contributions and the wishlist.
//! This layer handles:
//! - JSON request/response serialization
//! - Identity resolution from bearer tokens
//! - Error translation from domain errors to HTTP status codes
//! - Request logging
//!
//! Handlers carry no business rules; they build a command, call one service
//! and map the result.

pub mod auth_apis;
pub mod contribution_apis;
pub mod error;
pub mod mappers;
pub mod room_apis;
pub mod session;
pub mod user_apis;
pub mod wishlist_apis;

use axum::{response::Json, routing::get, Router};
use shared::MessageResponse;

use crate::AppState;

/// All API routes, to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    let room_routes = room_apis::router()
        .merge(contribution_apis::router())
        .merge(wishlist_apis::router());

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_apis::router())
        .nest("/rooms", room_routes)
        .nest("/users", user_apis::router())
}

pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse::new("OK"))
}
