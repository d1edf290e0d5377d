//! Contribution ledger: records what each member put into a room and each
//! member's share of the room total.
//!
//! The stored `contribution_percentage` only changes on an explicit
//! recompute. Listings compute shares on read, so they are never stale.

use chrono::Utc;
use shared::ContributionCategory;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::commands::contributions::RecordContributionCommand;
use crate::domain::errors::{non_empty, DomainError, DomainResult};
use crate::domain::models::contribution::{compute_percentages, month_key};
use crate::domain::models::{Contribution, Room};
use crate::storage::{Connection, ContributionStorage, RoomStorage};

#[derive(Clone)]
pub struct ContributionService<C: Connection> {
    contribution_repository: C::ContributionRepository,
    room_repository: C::RoomRepository,
}

impl<C: Connection> ContributionService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            contribution_repository: connection.create_contribution_repository(),
            room_repository: connection.create_room_repository(),
        }
    }

    /// Add a contribution to the actor's running totals in a room
    pub async fn record_contribution(
        &self,
        actor: Option<&str>,
        command: RecordContributionCommand,
    ) -> DomainResult<()> {
        let username = actor
            .ok_or_else(|| DomainError::unauthorized("You must be signed in to update contributions"))?
            .to_lowercase();

        let (room_id, amount, category) = match (
            non_empty(command.room_id.as_deref()),
            command.amount.filter(|amount| *amount != 0.0),
            non_empty(command.category.as_deref()),
        ) {
            (Some(room_id), Some(amount), Some(category)) => {
                (Room::normalize_code(room_id), amount, category)
            }
            _ => {
                return Err(DomainError::validation(
                    "Room ID, amount, and category are required",
                ))
            }
        };

        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation("Amount must be a positive number"));
        }

        let category: ContributionCategory = category.parse().map_err(|_| {
            DomainError::validation(format!(
                "Invalid category. Expected one of: {}",
                ContributionCategory::ALL.map(|c| c.as_str()).join(", ")
            ))
        })?;

        if !self.room_repository.room_exists(&room_id).await? {
            return Err(DomainError::not_found("Room not found"));
        }

        if let Some(description) = non_empty(command.description.as_deref()) {
            debug!("Contribution note from {}: {}", username, description);
        }

        let now = Utc::now();
        self.contribution_repository
            .record_contribution(
                &room_id,
                &username,
                &month_key(now),
                category,
                amount,
                &now.to_rfc3339(),
            )
            .await?;

        info!("Recorded {:.2} ({}) for {} in room {}", amount, category, username, room_id);
        Ok(())
    }

    /// Every member's record for a room, with shares computed from current totals
    pub async fn list_contributions(&self, room_id: Option<&str>) -> DomainResult<Vec<Contribution>> {
        let room_id = Self::require_room_id(room_id)?;
        let mut records = self.contribution_repository.list_contributions(&room_id).await?;

        let totals: Vec<f64> = records.iter().map(|r| r.total_contributed).collect();
        for (record, percentage) in records.iter_mut().zip(compute_percentages(&totals)) {
            record.contribution_percentage = percentage;
        }

        Ok(records)
    }

    /// Rewrite every member's stored share of the room total
    pub async fn recompute_percentages(&self, room_id: Option<&str>) -> DomainResult<Vec<Contribution>> {
        let room_id = Self::require_room_id(room_id)?;
        info!("Recomputing contribution percentages for room {}", room_id);

        let mut records = self.contribution_repository.list_contributions(&room_id).await?;
        let totals: Vec<f64> = records.iter().map(|r| r.total_contributed).collect();

        for (record, percentage) in records.iter_mut().zip(compute_percentages(&totals)) {
            self.contribution_repository
                .set_percentage(&room_id, &record.username, percentage)
                .await?;
            record.contribution_percentage = percentage;
        }

        Ok(records)
    }

    fn require_room_id(room_id: Option<&str>) -> DomainResult<String> {
        non_empty(room_id)
            .map(Room::normalize_code)
            .ok_or_else(|| DomainError::validation("Room ID is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> ContributionService<DbConnection> {
        let db = Arc::new(DbConnection::init_test().await.expect("Failed to create test database"));
        let room = Room {
            id: "ROOM01".to_string(),
            name: "Flat".to_string(),
            created_at: Utc::now(),
            created_by: "alice".to_string(),
            members: vec!["alice".to_string()],
        };
        db.create_room_repository().store_room(&room).await.unwrap();
        ContributionService::new(db)
    }

    fn contribution(amount: f64, category: &str) -> RecordContributionCommand {
        RecordContributionCommand {
            room_id: Some("ROOM01".to_string()),
            amount: Some(amount),
            category: Some(category.to_string()),
            description: Some("weekly shop".to_string()),
        }
    }

    #[tokio::test]
    async fn test_record_accumulates() {
        let service = setup_test().await;

        service.record_contribution(Some("alice"), contribution(100.0, "rent")).await.unwrap();
        service.record_contribution(Some("alice"), contribution(25.0, "groceries")).await.unwrap();

        let records = service.list_contributions(Some("ROOM01")).await.unwrap();
        assert_eq!(records.len(), 1);
        let alice = &records[0];
        assert_eq!(alice.total_contributed, 125.0);
        assert_eq!(alice.categories.rent, 100.0);
        assert_eq!(alice.categories.groceries, 25.0);
        assert_eq!(alice.monthly_contributions.get(&month_key(Utc::now())), Some(&125.0));
        assert_eq!(alice.contribution_percentage, 100.0);
    }

    #[tokio::test]
    async fn test_record_validation() {
        let service = setup_test().await;

        let err = service.record_contribution(None, contribution(10.0, "rent")).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        for command in [
            RecordContributionCommand::default(),
            contribution(0.0, "rent"),
            RecordContributionCommand {
                category: None,
                ..contribution(10.0, "rent")
            },
        ] {
            let err = service.record_contribution(Some("alice"), command).await.unwrap_err();
            assert!(
                matches!(err, DomainError::Validation(ref m) if m == "Room ID, amount, and category are required")
            );
        }

        let err = service.record_contribution(Some("alice"), contribution(-5.0, "rent")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service.record_contribution(Some("alice"), contribution(5.0, "furniture")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.starts_with("Invalid category")));

        let err = service
            .record_contribution(
                Some("alice"),
                RecordContributionCommand {
                    room_id: Some("NOPE00".to_string()),
                    ..contribution(5.0, "rent")
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_percentages_on_read_and_recompute() {
        let service = setup_test().await;
        service.record_contribution(Some("alice"), contribution(30.0, "other")).await.unwrap();
        service.record_contribution(Some("bob"), contribution(90.0, "other")).await.unwrap();

        let listed = service.list_contributions(Some("ROOM01")).await.unwrap();
        assert_eq!(listed[0].contribution_percentage, 25.0);
        assert_eq!(listed[1].contribution_percentage, 75.0);

        let recomputed = service.recompute_percentages(Some("ROOM01")).await.unwrap();
        let sum: f64 = recomputed.iter().map(|r| r.contribution_percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_room_id_required() {
        let service = setup_test().await;
        assert!(matches!(
            service.list_contributions(None).await.unwrap_err(),
            DomainError::Validation(ref m) if m == "Room ID is required"
        ));
        assert!(matches!(
            service.recompute_percentages(Some("")).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }
}
