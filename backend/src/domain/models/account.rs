use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::Value;

use super::random_suffix;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    /// Always stored lowercased; unique across accounts
    pub username: String,
    pub password_hash: String,
    pub room_id: Option<String>,
    /// Opaque document produced by the external financial data generator
    pub financial_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// `user_<epoch_millis>_<9 base-36 chars>`
    pub fn generate_id<R: Rng + ?Sized>(now_millis: i64, rng: &mut R) -> String {
        format!("user_{}_{}", now_millis, random_suffix(rng))
    }

    pub fn normalize_username(username: &str) -> String {
        username.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = Account::generate_id(1_700_000_000_000, &mut rand::thread_rng());
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "user");
        assert_eq!(parts[1], "1700000000000");
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(Account::normalize_username("  NewUser "), "newuser");
    }
}
