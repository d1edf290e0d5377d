//! Opaque-token sessions.
//!
//! Every sign-in or registration issues its own uuid token, so concurrent
//! users never see each other's identity. Sessions live in process memory
//! and do not expire; sign-out removes the token.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Lowercased username the token was issued for
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `username` and return its bearer token
    pub async fn sign_in_session(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_lowercase(),
            created_at: Utc::now(),
        };

        self.sessions.write().await.insert(token.clone(), session);
        info!("Opened session for {}", username);
        token
    }

    pub async fn current(&self, token: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(token).cloned();
        if session.is_none() {
            debug!("No session for presented token");
        }
        session
    }

    /// Returns false when the token was unknown
    pub async fn sign_out(&self, token: &str) -> bool {
        match self.sessions.write().await.remove(token) {
            Some(session) => {
                info!("Closed session for {}", session.username);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokens_are_isolated() {
        let service = SessionService::new();

        let alice = service.sign_in_session("Alice").await;
        let bob = service.sign_in_session("bob").await;
        assert_ne!(alice, bob);

        assert_eq!(service.current(&alice).await.unwrap().username, "alice");
        assert_eq!(service.current(&bob).await.unwrap().username, "bob");
    }

    #[tokio::test]
    async fn test_sign_out_removes_only_that_token() {
        let service = SessionService::new();
        let first = service.sign_in_session("alice").await;
        let second = service.sign_in_session("alice").await;

        assert!(service.sign_out(&first).await);
        assert!(!service.sign_out(&first).await);
        assert!(service.current(&first).await.is_none());
        assert!(service.current(&second).await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let service = SessionService::new();
        assert!(service.current("not-a-token").await.is_none());
    }
}
