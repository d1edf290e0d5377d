//! # Domain Module
//!
//! Business rules for shared living: accounts and sessions, rooms with join
//! codes, the per-room contribution ledger and the room wishlist.
//!
//! Services are generic over [`crate::storage::Connection`] so they can be
//! exercised against any storage backend. Every operation returns
//! [`DomainResult`]; the variant of [`DomainError`] tells the REST layer which
//! status to answer with.
//!
//! ## Module Organization
//!
//! - **models**: internal entities (accounts, rooms, contributions, wishlist items)
//! - **commands**: inputs and results passed between the REST layer and services
//! - **session_service**: opaque bearer tokens mapped to signed-in usernames
//! - **account_service**: registration, sign-in and per-user lookups
//! - **room_service**: room creation, joining and membership queries
//! - **contribution_service**: running totals and percentage shares
//! - **wishlist_service**: wishlist items, pledges and status changes
//! - **financial_data**: the external financial data generator
//!
//! ## Business Rules
//!
//! - Usernames are case-insensitive and stored lowercased
//! - A room code is six characters from `A-Z0-9` and unique across rooms
//! - A user appears at most once in a room's member list
//! - A member's share is their total over the room total, 0 when the room total is 0
//! - Only the creator of a wishlist item may delete it

pub mod account_service;
pub mod commands;
pub mod contribution_service;
pub mod errors;
pub mod financial_data;
pub mod models;
pub mod room_service;
pub mod session_service;
pub mod wishlist_service;

pub use account_service::AccountService;
pub use contribution_service::ContributionService;
pub use errors::{DomainError, DomainResult};
pub use financial_data::{DisabledGenerator, FinancialDataGenerator, ProcessGenerator};
pub use room_service::RoomService;
pub use session_service::{Session, SessionService};
pub use wishlist_service::WishlistService;
