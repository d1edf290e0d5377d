pub mod account_mapper;
pub mod contribution_mapper;
pub mod room_mapper;
pub mod wishlist_mapper;

pub use account_mapper::AccountMapper;
pub use contribution_mapper::ContributionMapper;
pub use room_mapper::RoomMapper;
pub use wishlist_mapper::WishlistMapper;
