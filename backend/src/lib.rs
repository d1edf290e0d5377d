//! # Roomloot Backend
//!
//! Server side of a shared-living app: roommates register, form a room with
//! a six character join code, log what they contribute toward shared
//! expenses and keep a wishlist of things to buy together.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, mappers)
//!     ↓
//! Domain Layer (services, business rules)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::domain::{
    AccountService, ContributionService, FinancialDataGenerator, RoomService, SessionService,
    WishlistService,
};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub session_service: SessionService,
    pub account_service: AccountService<DbConnection>,
    pub room_service: RoomService<DbConnection>,
    pub contribution_service: ContributionService<DbConnection>,
    pub wishlist_service: WishlistService<DbConnection>,
}

impl AppState {
    pub fn new(db: DbConnection, generator: Arc<dyn FinancialDataGenerator>) -> Self {
        let db = Arc::new(db);
        let session_service = SessionService::new();
        let room_service = RoomService::new(db.clone());
        let account_service = AccountService::new(
            db.clone(),
            room_service.clone(),
            session_service.clone(),
            generator,
        );

        Self {
            session_service,
            account_service,
            room_service,
            contribution_service: ContributionService::new(db.clone()),
            wishlist_service: WishlistService::new(db),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &ServerConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::init(&config.database_url).await?;

    match &config.generator_program {
        Some(program) => info!("Financial data generator: {}", program.display()),
        None => info!("No financial data generator configured; registrations will skip it"),
    }

    info!("Setting up application state");
    Ok(AppState::new(db, config.financial_data_generator()))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", io::rest::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
