//! # Storage Module
//!
//! Handles all data persistence for accounts, rooms, contributions and the
//! room wishlist.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite
//! implementation lives in [`connection`] and [`repositories`]. The store is
//! the single source of truth for rooms, so nothing here keeps state in
//! process memory.
//!
//! ## Collections
//!
//! - **accounts**: one row per user, keyed by lowercased username
//! - **rooms / room_members**: room metadata plus the ordered member list
//! - **contributions / contribution_months**: per (room, user) running totals
//! - **wishlist_items / wishlist_pledges**: proposed purchases and pledges

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{
    AccountRepository, ContributionRepository, RoomRepository, WishlistRepository,
};
pub use traits::{AccountStorage, Connection, ContributionStorage, RoomStorage, WishlistStorage};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp column
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid timestamp in store: {}", value))?
        .with_timezone(&Utc))
}
