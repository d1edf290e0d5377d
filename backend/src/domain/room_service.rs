//! Room membership: creating rooms with unique join codes, joining them and
//! looking them up.
//!
//! The store is the only source of truth for rooms, so a room created before
//! a restart is found exactly like one created a moment ago.

use anyhow::anyhow;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::rooms::{CreateRoomCommand, JoinRoomCommand};
use crate::domain::errors::{non_empty, DomainError, DomainResult};
use crate::domain::models::room::MIN_ROOM_NAME_LENGTH;
use crate::domain::models::{Account, Room};
use crate::storage::{AccountStorage, Connection, RoomStorage};

/// Attempts at inserting a freshly sampled code before giving up. Only a
/// concurrent create racing for the same code can use up more than one.
const MAX_CODE_ATTEMPTS: usize = 8;

#[derive(Clone)]
pub struct RoomService<C: Connection> {
    room_repository: C::RoomRepository,
    account_repository: C::AccountRepository,
}

impl<C: Connection> RoomService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            room_repository: connection.create_room_repository(),
            account_repository: connection.create_account_repository(),
        }
    }

    /// Create a room with a fresh code; the creator becomes its first member
    pub async fn create_room(&self, actor: Option<&str>, command: CreateRoomCommand) -> DomainResult<Room> {
        let name = non_empty(command.room_name.as_deref())
            .ok_or_else(|| DomainError::validation("Room name is required"))?;
        let creator = actor
            .ok_or_else(|| DomainError::unauthorized("You must be signed in to create a room"))?
            .to_lowercase();
        if name.chars().count() < MIN_ROOM_NAME_LENGTH {
            return Err(DomainError::validation(
                "Room name must be at least 3 characters long",
            ));
        }

        info!("Creating room '{}' for {}", name, creator);

        for _ in 0..MAX_CODE_ATTEMPTS {
            let existing = self.room_repository.list_room_ids().await?;
            let code = Room::generate_unique_code(&mut rand::thread_rng(), &existing);

            let room = Room {
                id: code,
                name: name.to_string(),
                created_at: Utc::now(),
                created_by: creator.clone(),
                members: vec![creator.clone()],
            };

            if self.room_repository.store_room(&room).await? {
                self.set_account_room(&creator, &room.id).await;
                info!("Created room {} ('{}')", room.id, room.name);
                return Ok(room);
            }
            warn!("Room code {} was taken concurrently, retrying", room.id);
        }

        Err(anyhow!("could not allocate a unique room code").into())
    }

    pub async fn join_room(&self, actor: Option<&str>, command: JoinRoomCommand) -> DomainResult<Room> {
        let room_id = non_empty(command.room_id.as_deref())
            .map(Room::normalize_code)
            .ok_or_else(|| DomainError::validation("Room ID is required"))?;
        let username = actor
            .ok_or_else(|| DomainError::unauthorized("You must be signed in to join a room"))?
            .to_lowercase();

        info!("{} joining room {}", username, room_id);

        let mut room = self.room_repository.get_room(&room_id).await?.ok_or_else(|| {
            DomainError::not_found("Room not found. Please check the room ID and try again.")
        })?;

        if room.is_member(&username) || !self.room_repository.add_member(&room_id, &username).await? {
            return Err(DomainError::conflict("You are already a member of this room"));
        }
        room.members.push(username.clone());

        self.set_account_room(&username, &room_id).await;
        info!("{} joined room {} ({} members)", username, room_id, room.members.len());
        Ok(room)
    }

    /// Attach a newly registered user to `code`: join the room when it exists,
    /// otherwise create it under that code, named after the code
    pub async fn attach_on_register(&self, code: &str, username: &str) -> DomainResult<Room> {
        let code = Room::normalize_code(code);

        if let Some(mut room) = self.room_repository.get_room(&code).await? {
            if self.room_repository.add_member(&code, username).await? {
                room.members.push(username.to_string());
            }
            self.set_account_room(username, &code).await;
            return Ok(room);
        }

        if !Room::is_valid_code(&code) {
            return Err(DomainError::validation(format!(
                "'{}' is not a valid room code",
                code
            )));
        }

        let room = Room {
            id: code.clone(),
            name: code.clone(),
            created_at: Utc::now(),
            created_by: username.to_string(),
            members: vec![username.to_string()],
        };
        if !self.room_repository.store_room(&room).await? {
            return Err(DomainError::conflict(format!("Room {} already exists", code)));
        }

        self.set_account_room(username, &code).await;
        info!("Created room {} during registration of {}", code, username);
        Ok(room)
    }

    /// Existence probe for the join form. None when no room has the code.
    pub async fn lookup_room(&self, room_id: Option<&str>) -> DomainResult<Option<Room>> {
        let room_id = non_empty(room_id)
            .map(Room::normalize_code)
            .ok_or_else(|| DomainError::validation("Room ID is required"))?;
        Ok(self.room_repository.get_room(&room_id).await?)
    }

    pub async fn list_rooms(&self) -> DomainResult<Vec<Room>> {
        Ok(self.room_repository.list_rooms().await?)
    }

    /// Accounts whose current room is `room_id`
    pub async fn room_members(&self, room_id: Option<&str>) -> DomainResult<Vec<Account>> {
        let room_id = non_empty(room_id)
            .map(Room::normalize_code)
            .ok_or_else(|| DomainError::validation("roomId is required"))?;
        Ok(self.account_repository.list_accounts_in_room(&room_id).await?)
    }

    async fn set_account_room(&self, username: &str, room_id: &str) {
        if let Err(e) = self.account_repository.set_room(username, room_id).await {
            warn!("Failed to record room {} on account {}: {}", room_id, username, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> (RoomService<DbConnection>, Arc<DbConnection>) {
        let db = Arc::new(DbConnection::init_test().await.expect("Failed to create test database"));
        (RoomService::new(db.clone()), db)
    }

    async fn add_account(db: &DbConnection, username: &str) {
        let account = Account {
            id: format!("user_1_{}", username),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            room_id: None,
            financial_data: None,
            created_at: Utc::now(),
        };
        db.create_account_repository().store_account(&account).await.unwrap();
    }

    fn create(name: &str) -> CreateRoomCommand {
        CreateRoomCommand {
            room_name: Some(name.to_string()),
        }
    }

    fn join(code: &str) -> JoinRoomCommand {
        JoinRoomCommand {
            room_id: Some(code.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_room_sets_creator_and_code() {
        let (service, db) = setup_test().await;
        add_account(&db, "alice").await;

        let room = service.create_room(Some("Alice"), create("Flat 4B")).await.unwrap();
        assert!(Room::is_valid_code(&room.id));
        assert_eq!(room.created_by, "alice");
        assert_eq!(room.members, vec!["alice"]);

        let account = db.create_account_repository().get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.room_id.as_deref(), Some(room.id.as_str()));
    }

    #[tokio::test]
    async fn test_create_room_validation_order() {
        let (service, _db) = setup_test().await;

        let err = service.create_room(None, CreateRoomCommand::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m == "Room name is required"));

        let err = service.create_room(None, create("Flat")).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let err = service.create_room(Some("alice"), create("ab")).await.unwrap_err();
        assert!(
            matches!(err, DomainError::Validation(ref m) if m == "Room name must be at least 3 characters long")
        );
    }

    #[tokio::test]
    async fn test_join_room() {
        let (service, db) = setup_test().await;
        add_account(&db, "bob").await;
        let room = service.create_room(Some("alice"), create("Flat")).await.unwrap();

        let joined = service
            .join_room(Some("bob"), join(&room.id.to_lowercase()))
            .await
            .unwrap();
        assert_eq!(joined.members, vec!["alice", "bob"]);

        let members = service.room_members(Some(room.id.as_str())).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].username, "bob");
    }

    #[tokio::test]
    async fn test_join_room_errors() {
        let (service, _db) = setup_test().await;
        let room = service.create_room(Some("alice"), create("Flat")).await.unwrap();

        let err = service.join_room(None, JoinRoomCommand::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m == "Room ID is required"));

        let err = service.join_room(None, join(&room.id)).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let err = service.join_room(Some("bob"), join("ZZZZZZ")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = service.join_room(Some("alice"), join(&room.id)).await.unwrap_err();
        assert!(
            matches!(err, DomainError::Conflict(ref m) if m == "You are already a member of this room")
        );
    }

    #[tokio::test]
    async fn test_rooms_survive_new_service_instances() {
        let (service, db) = setup_test().await;
        let room = service.create_room(Some("alice"), create("Flat")).await.unwrap();

        let restarted = RoomService::new(db.clone());
        assert!(restarted.lookup_room(Some(room.id.as_str())).await.unwrap().is_some());
        let joined = restarted.join_room(Some("bob"), join(&room.id)).await.unwrap();
        assert_eq!(joined.members.len(), 2);
    }

    #[tokio::test]
    async fn test_attach_on_register_creates_or_joins() {
        let (service, _db) = setup_test().await;

        let created = service.attach_on_register("abc123", "alice").await.unwrap();
        assert_eq!(created.id, "ABC123");
        assert_eq!(created.name, "ABC123");
        assert_eq!(created.members, vec!["alice"]);

        let joined = service.attach_on_register("ABC123", "bob").await.unwrap();
        assert_eq!(joined.members, vec!["alice", "bob"]);

        let err = service.attach_on_register("no!", "carol").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_lookup_and_list() {
        let (service, _db) = setup_test().await;
        let room = service.create_room(Some("alice"), create("Flat")).await.unwrap();

        assert!(service.lookup_room(Some(room.id.as_str())).await.unwrap().is_some());
        assert!(service.lookup_room(Some("ZZZZZZ")).await.unwrap().is_none());
        assert!(matches!(
            service.lookup_room(None).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        assert_eq!(service.list_rooms().await.unwrap().len(), 1);
        assert!(matches!(
            service.room_members(Some("  ")).await.unwrap_err(),
            DomainError::Validation(ref m) if m == "roomId is required"
        ));
    }
}
