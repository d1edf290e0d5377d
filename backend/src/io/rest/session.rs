//! Request identity.
//!
//! Clients present the token issued at sign-in or registration as
//! `Authorization: Bearer <token>`. A missing or unknown token is not a
//! rejection: handlers receive `SessionUser(None)` and the domain decides
//! whether the operation needs a signed-in user.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::convert::Infallible;

use crate::domain::Session;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct SessionUser(pub Option<Session>);

impl SessionUser {
    pub fn username(&self) -> Option<&str> {
        self.0.as_ref().map(|session| session.username.as_str())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = match bearer_token(&parts.headers) {
            Some(token) => state.session_service.current(token).await,
            None => None,
        };
        Ok(SessionUser(session))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc-123"));
        assert_eq!(bearer_token(&headers), Some("abc-123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
