//! Room wishlist: proposed purchases that members pledge money toward.

use chrono::Utc;
use shared::{Priority, WishlistStatus};
use std::sync::Arc;
use tracing::info;

use crate::domain::commands::wishlist::{AddWishlistItemCommand, UpdateWishlistItemCommand};
use crate::domain::errors::{non_empty, DomainError, DomainResult};
use crate::domain::models::{Room, WishlistItem};
use crate::storage::{Connection, RoomStorage, WishlistStorage};

const ITEM_NOT_FOUND: &str = "Wishlist item not found";

#[derive(Clone)]
pub struct WishlistService<C: Connection> {
    wishlist_repository: C::WishlistRepository,
    room_repository: C::RoomRepository,
}

impl<C: Connection> WishlistService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            wishlist_repository: connection.create_wishlist_repository(),
            room_repository: connection.create_room_repository(),
        }
    }

    /// Items for a room, newest first
    pub async fn list_items(&self, room_id: Option<&str>) -> DomainResult<Vec<WishlistItem>> {
        let room_id = non_empty(room_id)
            .map(Room::normalize_code)
            .ok_or_else(|| DomainError::validation("Room ID is required"))?;
        Ok(self.wishlist_repository.list_items(&room_id).await?)
    }

    pub async fn add_item(&self, actor: Option<&str>, command: AddWishlistItemCommand) -> DomainResult<WishlistItem> {
        let username = actor
            .ok_or_else(|| DomainError::unauthorized("You must be signed in to add wishlist items"))?
            .to_lowercase();

        let (room_id, item_name, estimated_cost, priority, category) = match (
            non_empty(command.room_id.as_deref()),
            non_empty(command.item_name.as_deref()),
            command.estimated_cost.filter(|cost| *cost != 0.0),
            non_empty(command.priority.as_deref()),
            non_empty(command.category.as_deref()),
        ) {
            (Some(room_id), Some(item_name), Some(cost), Some(priority), Some(category)) => {
                (Room::normalize_code(room_id), item_name, cost, priority, category)
            }
            _ => {
                return Err(DomainError::validation(
                    "Room ID, item name, estimated cost, priority, and category are required",
                ))
            }
        };

        if !estimated_cost.is_finite() || estimated_cost < 0.0 {
            return Err(DomainError::validation(
                "Estimated cost must be a positive number",
            ));
        }
        let priority: Priority = priority
            .parse()
            .map_err(|_| DomainError::validation("Priority must be one of: low, medium, high"))?;

        if !self.room_repository.room_exists(&room_id).await? {
            return Err(DomainError::not_found("Room not found"));
        }

        let now = Utc::now();
        let item = WishlistItem {
            id: WishlistItem::generate_id(now.timestamp_millis(), &mut rand::thread_rng()),
            room_id,
            username,
            item_name: item_name.to_string(),
            description: non_empty(command.description.as_deref())
                .unwrap_or_default()
                .to_string(),
            estimated_cost,
            priority,
            category: category.to_string(),
            created_at: now,
            status: WishlistStatus::Pending,
            pledges: Vec::new(),
        };

        self.wishlist_repository.store_item(&item).await?;
        info!("{} added wishlist item {} to room {}", item.username, item.id, item.room_id);
        Ok(item)
    }

    /// Apply a `contribute`, `uncontribute` or `update_status` action and
    /// return the item as stored afterwards
    pub async fn update_item(
        &self,
        actor: Option<&str>,
        command: UpdateWishlistItemCommand,
    ) -> DomainResult<WishlistItem> {
        let username = actor
            .ok_or_else(|| DomainError::unauthorized("You must be signed in to update wishlist items"))?
            .to_lowercase();

        let (item_id, action) = match (
            non_empty(command.item_id.as_deref()),
            non_empty(command.action.as_deref()),
        ) {
            (Some(item_id), Some(action)) => (item_id, action),
            _ => return Err(DomainError::validation("Item ID and action are required")),
        };

        if self.wishlist_repository.get_item(item_id).await?.is_none() {
            return Err(DomainError::not_found(ITEM_NOT_FOUND));
        }

        match action {
            "contribute" => {
                let amount = command
                    .contribution_amount
                    .filter(|amount| amount.is_finite() && *amount > 0.0)
                    .ok_or_else(|| DomainError::validation("Valid contribution amount is required"))?;
                let pledged = self
                    .wishlist_repository
                    .upsert_pledge(item_id, &username, amount, &Utc::now().to_rfc3339())
                    .await?;
                if !pledged {
                    return Err(DomainError::not_found(ITEM_NOT_FOUND));
                }
                info!("{} pledged {:.2} toward {}", username, amount, item_id);
            }
            "uncontribute" => {
                if self.wishlist_repository.remove_pledge(item_id, &username).await? {
                    info!("{} withdrew their pledge on {}", username, item_id);
                }
            }
            "update_status" => {
                let status: WishlistStatus = non_empty(command.status.as_deref())
                    .ok_or_else(|| {
                        DomainError::validation("Status is required for update_status action")
                    })?
                    .parse()
                    .map_err(|_| {
                        DomainError::validation(
                            "Status must be one of: pending, approved, purchased, cancelled",
                        )
                    })?;
                self.wishlist_repository.set_status(item_id, status).await?;
                info!("{} set {} to {}", username, item_id, status.as_str());
            }
            _ => return Err(DomainError::validation("Invalid action")),
        }

        self.wishlist_repository
            .get_item(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ITEM_NOT_FOUND))
    }

    /// Only the creator of an item may delete it
    pub async fn delete_item(&self, actor: Option<&str>, item_id: Option<&str>) -> DomainResult<()> {
        let username = actor
            .ok_or_else(|| DomainError::unauthorized("You must be signed in to delete wishlist items"))?
            .to_lowercase();
        let item_id = non_empty(item_id).ok_or_else(|| DomainError::validation("Item ID is required"))?;

        let item = self
            .wishlist_repository
            .get_item(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ITEM_NOT_FOUND))?;

        if item.username != username {
            return Err(DomainError::forbidden(
                "You can only delete your own wishlist items",
            ));
        }

        self.wishlist_repository.delete_item(item_id).await?;
        info!("{} deleted wishlist item {}", username, item_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> WishlistService<DbConnection> {
        let db = Arc::new(DbConnection::init_test().await.expect("Failed to create test database"));
        let room = Room {
            id: "ROOM01".to_string(),
            name: "Flat".to_string(),
            created_at: Utc::now(),
            created_by: "alice".to_string(),
            members: vec!["alice".to_string()],
        };
        db.create_room_repository().store_room(&room).await.unwrap();
        WishlistService::new(db)
    }

    fn couch() -> AddWishlistItemCommand {
        AddWishlistItemCommand {
            room_id: Some("ROOM01".to_string()),
            item_name: Some("Couch".to_string()),
            description: None,
            estimated_cost: Some(300.0),
            priority: Some("high".to_string()),
            category: Some("furniture".to_string()),
        }
    }

    fn action(item_id: &str, action: &str) -> UpdateWishlistItemCommand {
        UpdateWishlistItemCommand {
            item_id: Some(item_id.to_string()),
            action: Some(action.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_item_defaults() {
        let service = setup_test().await;

        let item = service.add_item(Some("alice"), couch()).await.unwrap();
        assert!(item.id.starts_with("wishlist_"));
        assert_eq!(item.status, WishlistStatus::Pending);
        assert_eq!(item.description, "");
        assert!(item.pledges.is_empty());

        let items = service.list_items(Some("room01")).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_add_item_validation() {
        let service = setup_test().await;

        assert!(matches!(
            service.add_item(None, couch()).await.unwrap_err(),
            DomainError::Unauthorized(_)
        ));

        let missing_cost = AddWishlistItemCommand {
            estimated_cost: None,
            ..couch()
        };
        assert!(matches!(
            service.add_item(Some("alice"), missing_cost).await.unwrap_err(),
            DomainError::Validation(ref m) if m.starts_with("Room ID, item name")
        ));

        let bad_priority = AddWishlistItemCommand {
            priority: Some("urgent".to_string()),
            ..couch()
        };
        assert!(matches!(
            service.add_item(Some("alice"), bad_priority).await.unwrap_err(),
            DomainError::Validation(ref m) if m == "Priority must be one of: low, medium, high"
        ));
    }

    #[tokio::test]
    async fn test_contribute_and_uncontribute() {
        let service = setup_test().await;
        let item = service.add_item(Some("alice"), couch()).await.unwrap();

        let updated = service
            .update_item(
                Some("bob"),
                UpdateWishlistItemCommand {
                    contribution_amount: Some(50.0),
                    ..action(&item.id, "contribute")
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.contributors(), vec!["bob"]);
        assert_eq!(updated.contribution_amounts().get("bob"), Some(&50.0));

        let updated = service
            .update_item(
                Some("bob"),
                UpdateWishlistItemCommand {
                    contribution_amount: Some(75.0),
                    ..action(&item.id, "contribute")
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.contributors(), vec!["bob"]);
        assert_eq!(updated.total_pledged(), 75.0);

        let updated = service.update_item(Some("bob"), action(&item.id, "uncontribute")).await.unwrap();
        assert!(updated.contributors().is_empty());
        assert!(updated.contribution_amounts().is_empty());
    }

    #[tokio::test]
    async fn test_update_errors() {
        let service = setup_test().await;
        let item = service.add_item(Some("alice"), couch()).await.unwrap();

        let cases = [
            (UpdateWishlistItemCommand::default(), "Item ID and action are required"),
            (action(&item.id, "contribute"), "Valid contribution amount is required"),
            (action(&item.id, "update_status"), "Status is required for update_status action"),
            (action(&item.id, "explode"), "Invalid action"),
        ];
        for (command, expected) in cases {
            let err = service.update_item(Some("bob"), command).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(ref m) if m == expected), "got {:?}", err);
        }

        let err = service.update_item(Some("bob"), action("missing", "contribute")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(ref m) if m == ITEM_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_update_status() {
        let service = setup_test().await;
        let item = service.add_item(Some("alice"), couch()).await.unwrap();

        let updated = service
            .update_item(
                Some("bob"),
                UpdateWishlistItemCommand {
                    status: Some("purchased".to_string()),
                    ..action(&item.id, "update_status")
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, WishlistStatus::Purchased);
    }

    #[tokio::test]
    async fn test_only_creator_can_delete() {
        let service = setup_test().await;
        let item = service.add_item(Some("alice"), couch()).await.unwrap();

        let err = service.delete_item(Some("bob"), Some(item.id.as_str())).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(service.list_items(Some("ROOM01")).await.unwrap().len(), 1);

        service.delete_item(Some("alice"), Some(item.id.as_str())).await.unwrap();
        assert!(service.list_items(Some("ROOM01")).await.unwrap().is_empty());

        let err = service.delete_item(Some("alice"), Some(item.id.as_str())).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = service.delete_item(Some("alice"), None).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m == "Item ID is required"));
    }
}
