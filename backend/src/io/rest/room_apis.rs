//! # REST API for Rooms
//!
//! Creating and joining rooms, the join-code probe and the member listing.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::domain::commands::rooms::{CreateRoomCommand, JoinRoomCommand};
use crate::domain::DomainError;
use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::{AccountMapper, RoomMapper};
use crate::io::rest::session::SessionUser;
use crate::AppState;
use shared::{
    CreateRoomRequest, JoinRoomRequest, RoomIdQuery, RoomListResponse, RoomLookupResponse,
    RoomMembersResponse, RoomResponse,
};

/// Create a router for room APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_room).get(list_rooms))
        .route("/join", post(join_room).get(lookup_room))
        .route("/members", get(room_members))
}

pub async fn create_room(
    State(state): State<AppState>,
    session: SessionUser,
    Json(request): Json<CreateRoomRequest>,
) -> impl IntoResponse {
    info!("POST /api/rooms/create - request: {:?}", request);

    let command = CreateRoomCommand {
        room_name: request.room_name,
    };

    match state.room_service.create_room(session.username(), command).await {
        Ok(room) => {
            let response = RoomResponse {
                message: "Room created successfully".to_string(),
                room: RoomMapper::to_summary(room),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn list_rooms(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/rooms/create");

    match state.room_service.list_rooms().await {
        Ok(rooms) => {
            let response = RoomListResponse {
                rooms: RoomMapper::to_summary_list(rooms),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn join_room(
    State(state): State<AppState>,
    session: SessionUser,
    Json(request): Json<JoinRoomRequest>,
) -> impl IntoResponse {
    info!("POST /api/rooms/join - request: {:?}", request);

    let command = JoinRoomCommand {
        room_id: request.room_id,
    };

    match state.room_service.join_room(session.username(), command).await {
        Ok(room) => {
            let response = RoomResponse {
                message: "Successfully joined room".to_string(),
                room: RoomMapper::to_summary(room),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Real-time validation for the join form
pub async fn lookup_room(
    State(state): State<AppState>,
    Query(query): Query<RoomIdQuery>,
) -> impl IntoResponse {
    info!("GET /api/rooms/join - roomId: {:?}", query.room_id);

    match state.room_service.lookup_room(query.room_id.as_deref()).await {
        Ok(room) => {
            let response = RoomLookupResponse {
                exists: room.is_some(),
                room: room.map(RoomMapper::to_summary),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(DomainError::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Json(RoomLookupResponse {
                exists: false,
                room: None,
            }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn room_members(
    State(state): State<AppState>,
    Query(query): Query<RoomIdQuery>,
) -> impl IntoResponse {
    info!("GET /api/rooms/members - roomId: {:?}", query.room_id);

    match state.room_service.room_members(query.room_id.as_deref()).await {
        Ok(accounts) => {
            let users = accounts.into_iter().map(AccountMapper::to_room_member).collect();
            (StatusCode::OK, Json(RoomMembersResponse { message: None, users })).into_response()
        }
        Err(DomainError::Validation(message)) => (
            StatusCode::BAD_REQUEST,
            Json(RoomMembersResponse {
                message: Some(message),
                users: Vec::new(),
            }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
