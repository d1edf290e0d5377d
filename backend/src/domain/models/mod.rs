//! Domain models for accounts, rooms, contributions and wishlist items.
//!
//! These are the internal representations the services work with; the
//! `shared` crate holds the wire DTOs and `io::rest::mappers` converts
//! between the two.

pub mod account;
pub mod contribution;
pub mod room;
pub mod wishlist;

pub use account::Account;
pub use contribution::Contribution;
pub use room::Room;
pub use wishlist::{Pledge, WishlistItem};

use rand::Rng;

const ID_SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Nine random base-36 characters, used as the tail of generated record ids
pub(crate) fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..9)
        .map(|_| ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())] as char)
        .collect()
}
