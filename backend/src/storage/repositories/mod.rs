pub mod account_repository;
pub mod contribution_repository;
pub mod room_repository;
pub mod wishlist_repository;

pub use account_repository::AccountRepository;
pub use contribution_repository::ContributionRepository;
pub use room_repository::RoomRepository;
pub use wishlist_repository::WishlistRepository;

/// True when a sqlx error is a UNIQUE / PRIMARY KEY violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
