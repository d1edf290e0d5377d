//! # REST API for Accounts and Sessions
//!
//! Registration, sign-in, sign-out and the username probes used by the
//! sign-up and sign-in forms.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::domain::commands::accounts::{RegisterCommand, SignInCommand};
use crate::domain::DomainError;
use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::{AccountMapper, RoomMapper};
use crate::io::rest::session::{bearer_token, SessionUser};
use crate::AppState;
use shared::{
    MessageResponse, RegisterRequest, SessionResponse, SignInRequest, SignInResponse,
    UserListResponse, UsernameAvailableResponse, UsernameExistsResponse, UsernameQuery,
};

/// Create a router for account and session APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register).get(username_available))
        .route("/signin", post(sign_in).get(username_exists))
        .route("/session", get(current_session))
        .route("/signout", post(sign_out))
        .route("/list", get(list_users))
}

/// Create an account; always 201 once the account exists, whether or not
/// financial data could be generated
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/auth/register - username: {:?}, roomId: {:?}",
        request.username, request.room_id
    );

    let command = RegisterCommand {
        username: request.username,
        password: request.password,
        room_id: request.room_id,
    };

    match state.account_service.register(command).await {
        Ok(result) => {
            let response = AccountMapper::to_register_response(result);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn username_available(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> impl IntoResponse {
    info!("GET /api/auth/register - username: {:?}", query.username);

    match state.account_service.username_available(query.username.as_deref()).await {
        Ok(available) => (StatusCode::OK, Json(UsernameAvailableResponse { available })).into_response(),
        Err(DomainError::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Json(UsernameAvailableResponse { available: false }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/signin - username: {:?}", request.username);

    let command = SignInCommand {
        username: request.username,
        password: request.password,
    };

    match state.account_service.sign_in(command).await {
        Ok(result) => {
            let response = SignInResponse {
                message: "Sign in successful".to_string(),
                username: result.username,
                token: result.token,
                room: result.room.map(RoomMapper::to_summary),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn username_exists(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> impl IntoResponse {
    info!("GET /api/auth/signin - username: {:?}", query.username);

    match state.account_service.username_exists(query.username.as_deref()).await {
        Ok(exists) => (StatusCode::OK, Json(UsernameExistsResponse { exists })).into_response(),
        Err(DomainError::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Json(UsernameExistsResponse { exists: false }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Username bound to the presented token, null when there is none
pub async fn current_session(session: SessionUser) -> impl IntoResponse {
    info!("GET /api/auth/session");

    Json(SessionResponse {
        username: session.username().map(str::to_string),
    })
}

pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/auth/signout");

    if let Some(token) = bearer_token(&headers) {
        state.session_service.sign_out(token).await;
    }
    Json(MessageResponse::new("Signed out successfully"))
}

pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/auth/list");

    match state.account_service.list_users().await {
        Ok(accounts) => {
            let users = accounts.into_iter().map(AccountMapper::to_list_entry).collect();
            (StatusCode::OK, Json(UserListResponse { users })).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
