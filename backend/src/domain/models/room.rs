use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashSet;

pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const ROOM_CODE_LENGTH: usize = 6;
pub const MIN_ROOM_NAME_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Six character join code
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    /// Usernames in join order; the creator is always first
    pub members: Vec<String>,
}

impl Room {
    pub fn is_member(&self, username: &str) -> bool {
        self.members.iter().any(|member| member == username)
    }

    pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
        (0..ROOM_CODE_LENGTH)
            .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect()
    }

    /// Rejection-samples codes until one is not in `existing`
    pub fn generate_unique_code<R: Rng + ?Sized>(rng: &mut R, existing: &HashSet<String>) -> String {
        loop {
            let code = Self::generate_code(rng);
            if !existing.contains(&code) {
                return code;
            }
        }
    }

    /// Trims and uppercases user-typed codes
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    pub fn is_valid_code(code: &str) -> bool {
        code.len() == ROOM_CODE_LENGTH && code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b))
    }
}
