use anyhow::Result;
use async_trait::async_trait;
use shared::{CategoryBreakdown, ContributionCategory};
use sqlx::{sqlite::SqliteRow, Row};
use std::collections::{BTreeMap, HashMap};

use crate::domain::models::Contribution;
use crate::storage::{parse_timestamp, traits::ContributionStorage, DbConnection};

/// Repository for per-member contribution totals
#[derive(Clone)]
pub struct ContributionRepository {
    db: DbConnection,
}

fn category_column(category: ContributionCategory) -> &'static str {
    match category {
        ContributionCategory::Groceries => "groceries",
        ContributionCategory::Utilities => "utilities",
        ContributionCategory::Rent => "rent",
        ContributionCategory::Entertainment => "entertainment",
        ContributionCategory::Other => "other",
    }
}

impl ContributionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_contribution(
        row: &SqliteRow,
        monthly_contributions: BTreeMap<String, f64>,
    ) -> Result<Contribution> {
        Ok(Contribution {
            room_id: row.get("room_id"),
            username: row.get("username"),
            total_contributed: row.get("total_contributed"),
            total_expenses: row.get("total_expenses"),
            contribution_percentage: row.get("contribution_percentage"),
            last_updated: parse_timestamp(&row.get::<String, _>("last_updated"))?,
            monthly_contributions,
            categories: CategoryBreakdown {
                groceries: row.get("groceries"),
                utilities: row.get("utilities"),
                rent: row.get("rent"),
                entertainment: row.get("entertainment"),
                other: row.get("other"),
            },
        })
    }
}

#[async_trait]
impl ContributionStorage for ContributionRepository {
    async fn get_contribution(&self, room_id: &str, username: &str) -> Result<Option<Contribution>> {
        let row = sqlx::query(
            r#"
            SELECT room_id, username, total_contributed, total_expenses,
                   contribution_percentage, last_updated,
                   groceries, utilities, rent, entertainment, other
            FROM contributions
            WHERE room_id = ? AND username = ?
            "#,
        )
        .bind(room_id)
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let month_rows = sqlx::query(
            r#"
            SELECT month, amount FROM contribution_months
            WHERE room_id = ? AND username = ?
            "#,
        )
        .bind(room_id)
        .bind(username)
        .fetch_all(self.db.pool())
        .await?;

        let months = month_rows
            .iter()
            .map(|r| (r.get("month"), r.get("amount")))
            .collect();

        Ok(Some(Self::row_to_contribution(&row, months)?))
    }

    async fn record_contribution(
        &self,
        room_id: &str,
        username: &str,
        month: &str,
        category: ContributionCategory,
        amount: f64,
        recorded_at: &str,
    ) -> Result<()> {
        let column = category_column(category);
        let mut tx = self.db.pool().begin().await?;

        let upsert_totals = format!(
            r#"
            INSERT INTO contributions
                (room_id, username, total_contributed, total_expenses,
                 contribution_percentage, last_updated, {column})
            VALUES (?, ?, ?, 0, 0, ?, ?)
            ON CONFLICT(room_id, username) DO UPDATE SET
                total_contributed = total_contributed + excluded.total_contributed,
                last_updated = excluded.last_updated,
                {column} = {column} + excluded.{column}
            "#
        );

        sqlx::query(&upsert_totals)
            .bind(room_id)
            .bind(username)
            .bind(amount)
            .bind(recorded_at)
            .bind(amount)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO contribution_months (room_id, username, month, amount)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(room_id, username, month) DO UPDATE SET
                amount = amount + excluded.amount
            "#,
        )
        .bind(room_id)
        .bind(username)
        .bind(month)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_contributions(&self, room_id: &str) -> Result<Vec<Contribution>> {
        let rows = sqlx::query(
            r#"
            SELECT room_id, username, total_contributed, total_expenses,
                   contribution_percentage, last_updated,
                   groceries, utilities, rent, entertainment, other
            FROM contributions
            WHERE room_id = ?
            ORDER BY rowid ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.pool())
        .await?;

        let month_rows = sqlx::query(
            r#"
            SELECT username, month, amount FROM contribution_months
            WHERE room_id = ?
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut months: HashMap<String, BTreeMap<String, f64>> = HashMap::new();
        for row in &month_rows {
            months
                .entry(row.get("username"))
                .or_default()
                .insert(row.get("month"), row.get("amount"));
        }

        rows.iter()
            .map(|row| {
                let username: String = row.get("username");
                let monthly = months.remove(&username).unwrap_or_default();
                Self::row_to_contribution(row, monthly)
            })
            .collect()
    }

    async fn set_percentage(&self, room_id: &str, username: &str, percentage: f64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE contributions
            SET contribution_percentage = ?
            WHERE room_id = ? AND username = ?
            "#,
        )
        .bind(percentage)
        .bind(room_id)
        .bind(username)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }
}
