use chrono::{DateTime, Utc};
use rand::Rng;
use shared::{Priority, WishlistStatus};
use std::collections::BTreeMap;

use super::random_suffix;

/// A single member's pledge toward a wishlist item
#[derive(Debug, Clone, PartialEq)]
pub struct Pledge {
    pub username: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WishlistItem {
    pub id: String,
    pub room_id: String,
    /// Creator; the only user allowed to delete the item
    pub username: String,
    pub item_name: String,
    pub description: String,
    pub estimated_cost: f64,
    pub priority: Priority,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub status: WishlistStatus,
    /// Pledges in the order they were first made
    pub pledges: Vec<Pledge>,
}

impl WishlistItem {
    /// `wishlist_<epoch_millis>_<9 base-36 chars>`
    pub fn generate_id<R: Rng + ?Sized>(now_millis: i64, rng: &mut R) -> String {
        format!("wishlist_{}_{}", now_millis, random_suffix(rng))
    }

    pub fn contributors(&self) -> Vec<String> {
        self.pledges.iter().map(|p| p.username.clone()).collect()
    }

    pub fn contribution_amounts(&self) -> BTreeMap<String, f64> {
        self.pledges
            .iter()
            .map(|p| (p.username.clone(), p.amount))
            .collect()
    }

    /// Sum of pledges; may exceed `estimated_cost`
    pub fn total_pledged(&self) -> f64 {
        self.pledges.iter().map(|p| p.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with(pledges: Vec<(&str, f64)>) -> WishlistItem {
        WishlistItem {
            id: "wishlist_1_abc".to_string(),
            room_id: "ROOM01".to_string(),
            username: "alice".to_string(),
            item_name: "Couch".to_string(),
            description: String::new(),
            estimated_cost: 100.0,
            priority: Priority::Medium,
            category: "furniture".to_string(),
            created_at: Utc::now(),
            status: WishlistStatus::Pending,
            pledges: pledges
                .into_iter()
                .map(|(u, a)| Pledge { username: u.to_string(), amount: a })
                .collect(),
        }
    }

    #[test]
    fn test_contributors_keep_pledge_order() {
        let item = item_with(vec![("carol", 10.0), ("alice", 20.0)]);
        assert_eq!(item.contributors(), vec!["carol", "alice"]);
        assert_eq!(item.contribution_amounts().get("alice"), Some(&20.0));
    }

    #[test]
    fn test_total_pledged_can_exceed_cost() {
        let item = item_with(vec![("bob", 80.0), ("carol", 45.0)]);
        assert_eq!(item.total_pledged(), 125.0);
        assert!(item.total_pledged() > item.estimated_cost);
    }

    #[test]
    fn test_generate_id_prefix() {
        let id = WishlistItem::generate_id(42, &mut rand::thread_rng());
        assert!(id.starts_with("wishlist_42_"));
        assert_eq!(id.len(), "wishlist_42_".len() + 9);
    }
}
