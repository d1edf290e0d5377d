use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;
use std::collections::{HashMap, HashSet};

use crate::domain::models::Room;
use crate::storage::{parse_timestamp, traits::RoomStorage, DbConnection};

/// Repository for rooms and their member lists
#[derive(Clone)]
pub struct RoomRepository {
    db: DbConnection,
}

impl RoomRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn members_of(&self, room_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT username FROM room_members
            WHERE room_id = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(|row| row.get("username")).collect())
    }
}

#[async_trait]
impl RoomStorage for RoomRepository {
    async fn store_room(&self, room: &Room) -> Result<bool> {
        let created_at = room.created_at.to_rfc3339();
        let mut tx = self.db.pool().begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO rooms (id, name, created_at, created_by)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&room.id)
        .bind(&room.name)
        .bind(&created_at)
        .bind(&room.created_by)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for member in &room.members {
            sqlx::query(
                r#"
                INSERT INTO room_members (room_id, username, joined_at)
                VALUES (?, ?, ?)
                ON CONFLICT(room_id, username) DO NOTHING
                "#,
            )
            .bind(&room.id)
            .bind(member)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn get_room(&self, room_id: &str) -> Result<Option<Room>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, created_by
            FROM rooms
            WHERE id = ?
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => {
                let id: String = r.get("id");
                let members = self.members_of(&id).await?;
                Ok(Some(Room {
                    id,
                    name: r.get("name"),
                    created_at: parse_timestamp(&r.get::<String, _>("created_at"))?,
                    created_by: r.get("created_by"),
                    members,
                }))
            }
            None => Ok(None),
        }
    }

    async fn room_exists(&self, room_id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM rooms WHERE id = ?")
            .bind(room_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.is_some())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        let room_rows = sqlx::query(
            r#"
            SELECT id, name, created_at, created_by
            FROM rooms
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let member_rows = sqlx::query(
            r#"
            SELECT room_id, username FROM room_members
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let mut members: HashMap<String, Vec<String>> = HashMap::new();
        for row in &member_rows {
            members
                .entry(row.get("room_id"))
                .or_default()
                .push(row.get("username"));
        }

        room_rows
            .iter()
            .map(|r| {
                let id: String = r.get("id");
                Ok(Room {
                    members: members.remove(&id).unwrap_or_default(),
                    id,
                    name: r.get("name"),
                    created_at: parse_timestamp(&r.get::<String, _>("created_at"))?,
                    created_by: r.get("created_by"),
                })
            })
            .collect()
    }

    async fn list_room_ids(&self) -> Result<HashSet<String>> {
        let rows = sqlx::query("SELECT id FROM rooms")
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows.iter().map(|row| row.get("id")).collect())
    }

    async fn add_member(&self, room_id: &str, username: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO room_members (room_id, username, joined_at)
            VALUES (?, ?, ?)
            ON CONFLICT(room_id, username) DO NOTHING
            "#,
        )
        .bind(room_id)
        .bind(username)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn setup_test() -> RoomRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        RoomRepository::new(db)
    }

    fn room(id: &str, creator: &str) -> Room {
        Room {
            id: id.to_string(),
            name: "Test Room".to_string(),
            created_at: Utc::now(),
            created_by: creator.to_string(),
            members: vec![creator.to_string()],
        }
    }

    #[tokio::test]
    async fn test_store_and_get_room() {
        let repo = setup_test().await;

        assert!(repo.store_room(&room("ABC123", "alice")).await.expect("Failed to store room"));

        let stored = repo.get_room("ABC123").await.unwrap().expect("Room missing");
        assert_eq!(stored.name, "Test Room");
        assert_eq!(stored.created_by, "alice");
        assert_eq!(stored.members, vec!["alice".to_string()]);

        assert!(repo.room_exists("ABC123").await.unwrap());
        assert!(!repo.room_exists("ZZZ999").await.unwrap());
        assert!(repo.get_room("ZZZ999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_room_rejects_code_collision() {
        let repo = setup_test().await;

        assert!(repo.store_room(&room("ABC123", "alice")).await.unwrap());
        assert!(!repo.store_room(&room("ABC123", "bob")).await.unwrap());

        let stored = repo.get_room("ABC123").await.unwrap().unwrap();
        assert_eq!(stored.created_by, "alice");
        assert_eq!(stored.members, vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_add_member_preserves_order_and_rejects_duplicates() {
        let repo = setup_test().await;
        repo.store_room(&room("ABC123", "alice")).await.unwrap();

        assert!(repo.add_member("ABC123", "bob").await.unwrap());
        assert!(repo.add_member("ABC123", "carol").await.unwrap());
        assert!(!repo.add_member("ABC123", "bob").await.unwrap());

        let stored = repo.get_room("ABC123").await.unwrap().unwrap();
        assert_eq!(stored.members, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_list_rooms_and_ids() {
        let repo = setup_test().await;
        repo.store_room(&room("AAA111", "alice")).await.unwrap();
        repo.store_room(&room("BBB222", "bob")).await.unwrap();
        repo.add_member("BBB222", "carol").await.unwrap();

        let rooms = repo.list_rooms().await.unwrap();
        assert_eq!(rooms.len(), 2);
        let second = rooms.iter().find(|r| r.id == "BBB222").unwrap();
        assert_eq!(second.members, vec!["bob", "carol"]);

        let ids = repo.list_room_ids().await.unwrap();
        assert!(ids.contains("AAA111"));
        assert!(ids.contains("BBB222"));
    }
}
