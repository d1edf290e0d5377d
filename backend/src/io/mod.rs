//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services.
//!
//! Handlers translate request DTOs from the `shared` crate into domain
//! commands, call the matching service and map the outcome back into
//! response DTOs. Domain errors become status codes in one place,
//! [`rest::error::ApiError`].
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum, with services injected through `State<AppState>`
//! - **Serialization**: Serde JSON, camelCase on the wire
//! - **Identity**: `Authorization: Bearer <token>` resolved by [`rest::session::SessionUser`]

pub mod rest;
