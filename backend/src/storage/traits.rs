//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work against any
//! backend. Each trait corresponds to one document collection of the
//! original design; every method is a single atomic store operation.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use shared::{ContributionCategory, WishlistStatus};
use std::collections::HashSet;

use crate::domain::models::{Account, Contribution, Room, WishlistItem};

#[async_trait]
pub trait AccountStorage: Send + Sync {
    /// Store a new account. Returns false when the username is already taken.
    async fn store_account(&self, account: &Account) -> Result<bool>;

    /// Look up an account by its (lowercased) username
    async fn get_account(&self, username: &str) -> Result<Option<Account>>;

    /// List all accounts ordered by creation
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// List accounts whose current room is `room_id`
    async fn list_accounts_in_room(&self, room_id: &str) -> Result<Vec<Account>>;

    /// Point an account at a room
    async fn set_room(&self, username: &str, room_id: &str) -> Result<()>;

    /// Replace the account's financial data blob
    async fn set_financial_data(&self, username: &str, data: &Value) -> Result<()>;
}

#[async_trait]
pub trait RoomStorage: Send + Sync {
    /// Store a room together with its initial member list.
    /// Returns false when the room code is already in use.
    async fn store_room(&self, room: &Room) -> Result<bool>;

    async fn get_room(&self, room_id: &str) -> Result<Option<Room>>;

    async fn room_exists(&self, room_id: &str) -> Result<bool>;

    /// List all rooms ordered by creation
    async fn list_rooms(&self) -> Result<Vec<Room>>;

    /// Codes of every stored room, for collision checks
    async fn list_room_ids(&self) -> Result<HashSet<String>>;

    /// Append a member. Returns false when the user is already a member.
    async fn add_member(&self, room_id: &str, username: &str) -> Result<bool>;
}

#[async_trait]
pub trait ContributionStorage: Send + Sync {
    async fn get_contribution(&self, room_id: &str, username: &str) -> Result<Option<Contribution>>;

    /// Add `amount` to the member's total, the `month` bucket and the category bucket,
    /// creating the record seeded with this single contribution when none exists
    async fn record_contribution(
        &self,
        room_id: &str,
        username: &str,
        month: &str,
        category: ContributionCategory,
        amount: f64,
        recorded_at: &str,
    ) -> Result<()>;

    /// All records for a room in the order they were created
    async fn list_contributions(&self, room_id: &str) -> Result<Vec<Contribution>>;

    async fn set_percentage(&self, room_id: &str, username: &str, percentage: f64) -> Result<()>;
}

#[async_trait]
pub trait WishlistStorage: Send + Sync {
    async fn store_item(&self, item: &WishlistItem) -> Result<()>;

    async fn get_item(&self, item_id: &str) -> Result<Option<WishlistItem>>;

    /// Items for a room, newest first
    async fn list_items(&self, room_id: &str) -> Result<Vec<WishlistItem>>;

    /// Add the user as a contributor or replace their pledged amount.
    /// Returns false when the item no longer exists.
    async fn upsert_pledge(&self, item_id: &str, username: &str, amount: f64, pledged_at: &str) -> Result<bool>;

    /// Returns false when the user had no pledge on the item
    async fn remove_pledge(&self, item_id: &str, username: &str) -> Result<bool>;

    async fn set_status(&self, item_id: &str, status: WishlistStatus) -> Result<()>;

    /// Delete an item and its pledges. Returns false when the item did not exist.
    async fn delete_item(&self, item_id: &str) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// Abstracts the concrete connection type and provides factory methods for
/// repositories, so services can be written once against any backend.
pub trait Connection: Send + Sync + Clone + 'static {
    type AccountRepository: AccountStorage + Clone + 'static;
    type RoomRepository: RoomStorage + Clone + 'static;
    type ContributionRepository: ContributionStorage + Clone + 'static;
    type WishlistRepository: WishlistStorage + Clone + 'static;

    fn create_account_repository(&self) -> Self::AccountRepository;
    fn create_room_repository(&self) -> Self::RoomRepository;
    fn create_contribution_repository(&self) -> Self::ContributionRepository;
    fn create_wishlist_repository(&self) -> Self::WishlistRepository;
}
