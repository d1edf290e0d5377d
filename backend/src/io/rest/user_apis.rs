//! # REST API for Per-User Resources
//!
//! A user's current room and their generated financial data. Both are only
//! visible to the signed-in user they belong to.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::RoomMapper;
use crate::io::rest::session::SessionUser;
use crate::AppState;
use shared::{FinancialDataResponse, StoredFinancialDataResponse, UserRoomResponse};

/// Create a router for per-user APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id/room", get(user_room))
        .route(
            "/:user_id/financial-data",
            get(get_financial_data).post(generate_financial_data),
        )
}

pub async fn user_room(
    State(state): State<AppState>,
    session: SessionUser,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/room", user_id);

    match state.account_service.user_room(session.username(), &user_id).await {
        Ok(result) => {
            let response = UserRoomResponse {
                has_room: result.room.is_some(),
                room: result.room.map(RoomMapper::to_summary),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Run the generator again and store the fresh document on the account
pub async fn generate_financial_data(
    State(state): State<AppState>,
    session: SessionUser,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/financial-data", user_id);

    match state
        .account_service
        .regenerate_financial_data(session.username(), &user_id)
        .await
    {
        Ok(generated) => {
            let response = FinancialDataResponse {
                success: true,
                message: format!(
                    "Financial data generated successfully for user {}",
                    generated.user_id
                ),
                data: generated.data,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_financial_data(
    State(state): State<AppState>,
    session: SessionUser,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/financial-data", user_id);

    match state
        .account_service
        .get_financial_data(session.username(), &user_id)
        .await
    {
        Ok(account) => {
            let response = StoredFinancialDataResponse {
                username: account.username,
                financial_data: account.financial_data,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
