//! # REST API for the Room Wishlist

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::commands::wishlist::{AddWishlistItemCommand, UpdateWishlistItemCommand};
use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::WishlistMapper;
use crate::io::rest::session::SessionUser;
use crate::AppState;
use shared::{
    AddWishlistItemRequest, AmountInput, MessageResponse, RoomIdQuery, UpdateWishlistItemRequest,
    WishlistItemQuery, WishlistItemResponse, WishlistListResponse,
};

/// Create a router for wishlist APIs
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/wishlist",
        get(list_items)
            .post(add_item)
            .put(update_item)
            .delete(delete_item),
    )
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<RoomIdQuery>,
) -> impl IntoResponse {
    info!("GET /api/rooms/wishlist - roomId: {:?}", query.room_id);

    match state.wishlist_service.list_items(query.room_id.as_deref()).await {
        Ok(items) => {
            let response = WishlistListResponse {
                wishlist_items: WishlistMapper::to_dto_list(items),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn add_item(
    State(state): State<AppState>,
    session: SessionUser,
    Json(request): Json<AddWishlistItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/rooms/wishlist - request: {:?}", request);

    let command = AddWishlistItemCommand {
        room_id: request.room_id,
        item_name: request.item_name,
        description: request.description,
        estimated_cost: request.estimated_cost.as_ref().and_then(AmountInput::as_f64),
        priority: request.priority,
        category: request.category,
    };

    match state.wishlist_service.add_item(session.username(), command).await {
        Ok(item) => {
            let response = WishlistItemResponse {
                message: "Wishlist item added successfully".to_string(),
                item: WishlistMapper::to_dto(item),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_item(
    State(state): State<AppState>,
    session: SessionUser,
    Json(request): Json<UpdateWishlistItemRequest>,
) -> impl IntoResponse {
    info!("PUT /api/rooms/wishlist - request: {:?}", request);

    let command = UpdateWishlistItemCommand {
        item_id: request.item_id,
        action: request.action,
        contribution_amount: request.contribution_amount.as_ref().and_then(AmountInput::as_f64),
        status: request.status,
    };

    match state.wishlist_service.update_item(session.username(), command).await {
        Ok(item) => {
            let response = WishlistItemResponse {
                message: "Wishlist item updated successfully".to_string(),
                item: WishlistMapper::to_dto(item),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_item(
    State(state): State<AppState>,
    session: SessionUser,
    Query(query): Query<WishlistItemQuery>,
) -> impl IntoResponse {
    info!("DELETE /api/rooms/wishlist - itemId: {:?}", query.item_id);

    match state
        .wishlist_service
        .delete_item(session.username(), query.item_id.as_deref())
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Wishlist item deleted successfully")),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
