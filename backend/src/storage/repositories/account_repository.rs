use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{sqlite::SqliteRow, Row};

use super::is_unique_violation;
use crate::domain::models::Account;
use crate::storage::{parse_timestamp, traits::AccountStorage, DbConnection};

/// Repository for account operations
#[derive(Clone)]
pub struct AccountRepository {
    db: DbConnection,
}

impl AccountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_account(row: &SqliteRow) -> Result<Account> {
        let financial_data = row
            .get::<Option<String>, _>("financial_data")
            .map(|raw| serde_json::from_str::<Value>(&raw))
            .transpose()
            .context("Stored financial data is not valid JSON")?;

        Ok(Account {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            room_id: row.get("room_id"),
            financial_data,
            created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
        })
    }
}

#[async_trait]
impl AccountStorage for AccountRepository {
    async fn store_account(&self, account: &Account) -> Result<bool> {
        let financial_data = account
            .financial_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (id, username, password_hash, room_id, financial_data, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.room_id)
        .bind(financial_data)
        .bind(account.created_at.to_rfc3339())
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, room_id, financial_data, created_at
            FROM accounts
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, password_hash, room_id, financial_data, created_at
            FROM accounts
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_account).collect()
    }

    async fn list_accounts_in_room(&self, room_id: &str) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, password_hash, room_id, financial_data, created_at
            FROM accounts
            WHERE room_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_account).collect()
    }

    async fn set_room(&self, username: &str, room_id: &str) -> Result<()> {
        sqlx::query("UPDATE accounts SET room_id = ? WHERE username = ?")
            .bind(room_id)
            .bind(username)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn set_financial_data(&self, username: &str, data: &Value) -> Result<()> {
        sqlx::query("UPDATE accounts SET financial_data = ? WHERE username = ?")
            .bind(serde_json::to_string(data)?)
            .bind(username)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}
