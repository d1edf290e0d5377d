//! # REST API for the Contribution Ledger

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::commands::contributions::RecordContributionCommand;
use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::ContributionMapper;
use crate::io::rest::session::SessionUser;
use crate::AppState;
use shared::{
    AmountInput, ContributionListResponse, MessageResponse, RecomputePercentagesRequest,
    RecordContributionRequest, RoomIdQuery,
};

/// Create a router for contribution APIs
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/contributions",
        get(list_contributions)
            .post(record_contribution)
            .put(recompute_percentages),
    )
}

pub async fn list_contributions(
    State(state): State<AppState>,
    Query(query): Query<RoomIdQuery>,
) -> impl IntoResponse {
    info!("GET /api/rooms/contributions - roomId: {:?}", query.room_id);

    match state.contribution_service.list_contributions(query.room_id.as_deref()).await {
        Ok(records) => {
            let response = ContributionListResponse {
                contributions: ContributionMapper::to_dto_list(records),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn record_contribution(
    State(state): State<AppState>,
    session: SessionUser,
    Json(request): Json<RecordContributionRequest>,
) -> impl IntoResponse {
    info!("POST /api/rooms/contributions - request: {:?}", request);

    let command = RecordContributionCommand {
        room_id: request.room_id,
        amount: request.amount.as_ref().and_then(AmountInput::as_f64),
        category: request.category,
        description: request.description,
    };

    match state
        .contribution_service
        .record_contribution(session.username(), command)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Contribution recorded successfully")),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn recompute_percentages(
    State(state): State<AppState>,
    Json(request): Json<RecomputePercentagesRequest>,
) -> impl IntoResponse {
    info!("PUT /api/rooms/contributions - request: {:?}", request);

    match state
        .contribution_service
        .recompute_percentages(request.room_id.as_deref())
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse::new(
                "Contribution percentages updated successfully",
            )),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
