//! Translation of domain errors into HTTP responses.
//!
//! Every error body has the shape `{"message": "..."}`. Storage and generator
//! failures are logged here and reported with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::MessageResponse;
use tracing::{error, info};

use crate::domain::DomainError;

const GENERATOR_FAILED: &str = "Financial data generation failed";

#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Generator(_) | DomainError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.0 {
            DomainError::Storage(err) => {
                error!("Storage error: {:#}", err);
                "Internal server error".to_string()
            }
            err @ DomainError::Generator(_) => {
                error!("{}", err);
                GENERATOR_FAILED.to_string()
            }
            other => {
                info!("Request rejected ({}): {}", status, other);
                other.to_string()
            }
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (DomainError::forbidden("x"), StatusCode::FORBIDDEN),
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (DomainError::Generator("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Storage(anyhow!("disk full")), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_storage_errors_are_not_leaked() {
        let response = ApiError::from(DomainError::Storage(anyhow!("secret path /var/db"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message: MessageResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(message.message, "Internal server error");
    }

    #[tokio::test]
    async fn test_generator_stderr_is_not_leaked() {
        let response =
            ApiError::from(DomainError::Generator("traceback in /opt/gen/main.py".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message: MessageResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(message.message, "Financial data generation failed");
    }
}
