use shared::WishlistItem as WishlistItemDto;

use crate::domain::models::WishlistItem;

pub struct WishlistMapper;

impl WishlistMapper {
    /// Convert a domain item to its DTO, expanding pledges into the
    /// contributor list and the per-user amount map
    pub fn to_dto(item: WishlistItem) -> WishlistItemDto {
        WishlistItemDto {
            contributors: item.contributors(),
            contribution_amounts: item.contribution_amounts(),
            id: item.id,
            room_id: item.room_id,
            user_id: item.username.clone(),
            username: item.username,
            item_name: item.item_name,
            description: item.description,
            estimated_cost: item.estimated_cost,
            priority: item.priority,
            category: item.category,
            created_at: item.created_at.to_rfc3339(),
            status: item.status,
        }
    }

    pub fn to_dto_list(items: Vec<WishlistItem>) -> Vec<WishlistItemDto> {
        items.into_iter().map(Self::to_dto).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Pledge;
    use chrono::Utc;
    use shared::{Priority, WishlistStatus};

    #[test]
    fn test_pledges_expand_consistently() {
        let item = WishlistItem {
            id: "wishlist_1_abc".to_string(),
            room_id: "ROOM01".to_string(),
            username: "alice".to_string(),
            item_name: "Couch".to_string(),
            description: String::new(),
            estimated_cost: 300.0,
            priority: Priority::Medium,
            category: "furniture".to_string(),
            created_at: Utc::now(),
            status: WishlistStatus::Pending,
            pledges: vec![
                Pledge { username: "carol".to_string(), amount: 20.0 },
                Pledge { username: "bob".to_string(), amount: 50.0 },
            ],
        };

        let dto = WishlistMapper::to_dto(item);
        assert_eq!(dto.contributors, vec!["carol", "bob"]);
        assert_eq!(dto.contribution_amounts.len(), 2);
        assert_eq!(dto.contribution_amounts["bob"], 50.0);
        assert_eq!(dto.user_id, "alice");
    }
}
