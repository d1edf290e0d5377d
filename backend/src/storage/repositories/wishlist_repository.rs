use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{Priority, WishlistStatus};
use sqlx::{sqlite::SqliteRow, Row};
use std::collections::HashMap;

use crate::domain::models::{Pledge, WishlistItem};
use crate::storage::{parse_timestamp, traits::WishlistStorage, DbConnection};

/// Repository for wishlist items and the pledges made toward them
#[derive(Clone)]
pub struct WishlistRepository {
    db: DbConnection,
}

impl WishlistRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_item(row: &SqliteRow, pledges: Vec<Pledge>) -> Result<WishlistItem> {
        let priority: String = row.get("priority");
        let status: String = row.get("status");

        Ok(WishlistItem {
            id: row.get("id"),
            room_id: row.get("room_id"),
            username: row.get("username"),
            item_name: row.get("item_name"),
            description: row.get("description"),
            estimated_cost: row.get("estimated_cost"),
            priority: priority.parse::<Priority>().map_err(|e| anyhow!(e))?,
            category: row.get("category"),
            created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
            status: status.parse::<WishlistStatus>().map_err(|e| anyhow!(e))?,
            pledges,
        })
    }
}

#[async_trait]
impl WishlistStorage for WishlistRepository {
    async fn store_item(&self, item: &WishlistItem) -> Result<()> {
        let created_at = item.created_at.to_rfc3339();
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO wishlist_items
                (id, room_id, username, item_name, description, estimated_cost,
                 priority, category, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.room_id)
        .bind(&item.username)
        .bind(&item.item_name)
        .bind(&item.description)
        .bind(item.estimated_cost)
        .bind(item.priority.as_str())
        .bind(&item.category)
        .bind(item.status.as_str())
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;

        for pledge in &item.pledges {
            sqlx::query(
                r#"
                INSERT INTO wishlist_pledges (item_id, username, amount, pledged_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&item.id)
            .bind(&pledge.username)
            .bind(pledge.amount)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_item(&self, item_id: &str) -> Result<Option<WishlistItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, room_id, username, item_name, description, estimated_cost,
                   priority, category, status, created_at
            FROM wishlist_items
            WHERE id = ?
            "#,
        )
        .bind(item_id)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let pledge_rows = sqlx::query(
            r#"
            SELECT username, amount FROM wishlist_pledges
            WHERE item_id = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(item_id)
        .fetch_all(self.db.pool())
        .await?;

        let pledges = pledge_rows
            .iter()
            .map(|r| Pledge {
                username: r.get("username"),
                amount: r.get("amount"),
            })
            .collect();

        Ok(Some(Self::row_to_item(&row, pledges)?))
    }

    async fn list_items(&self, room_id: &str) -> Result<Vec<WishlistItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, room_id, username, item_name, description, estimated_cost,
                   priority, category, status, created_at
            FROM wishlist_items
            WHERE room_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.pool())
        .await?;

        let pledge_rows = sqlx::query(
            r#"
            SELECT p.item_id, p.username, p.amount
            FROM wishlist_pledges p
            JOIN wishlist_items i ON i.id = p.item_id
            WHERE i.room_id = ?
            ORDER BY p.seq ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut pledges: HashMap<String, Vec<Pledge>> = HashMap::new();
        for row in &pledge_rows {
            pledges.entry(row.get("item_id")).or_default().push(Pledge {
                username: row.get("username"),
                amount: row.get("amount"),
            });
        }

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                Self::row_to_item(row, pledges.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    async fn upsert_pledge(&self, item_id: &str, username: &str, amount: f64, pledged_at: &str) -> Result<bool> {
        // Guarded so a pledge racing a delete cannot leave an orphan row
        let result = sqlx::query(
            r#"
            INSERT INTO wishlist_pledges (item_id, username, amount, pledged_at)
            SELECT ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM wishlist_items WHERE id = ?)
            ON CONFLICT(item_id, username) DO UPDATE SET
                amount = excluded.amount,
                pledged_at = excluded.pledged_at
            "#,
        )
        .bind(item_id)
        .bind(username)
        .bind(amount)
        .bind(pledged_at)
        .bind(item_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_pledge(&self, item_id: &str, username: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM wishlist_pledges WHERE item_id = ? AND username = ?")
            .bind(item_id)
            .bind(username)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_status(&self, item_id: &str, status: WishlistStatus) -> Result<()> {
        sqlx::query("UPDATE wishlist_items SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(item_id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn delete_item(&self, item_id: &str) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM wishlist_pledges WHERE item_id = ?")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM wishlist_items WHERE id = ?")
            .bind(item_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }
}
