use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

use super::repositories::{
    AccountRepository, ContributionRepository, RoomRepository, WishlistRepository,
};
use super::traits::Connection;

/// DbConnection owns the shared SQLite pool; repositories borrow it
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection, creating the database file and schema if needed
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the database at the configured URL
    pub async fn init(url: &str) -> Result<Self> {
        Self::new(url).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("sqlite:file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                room_id TEXT,
                financial_data TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_accounts_room_id
            ON accounts(room_id);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                created_by TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // seq preserves join order; the unique pair makes joins idempotent
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS room_members (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                room_id TEXT NOT NULL,
                username TEXT NOT NULL,
                joined_at TEXT NOT NULL,
                UNIQUE (room_id, username)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contributions (
                room_id TEXT NOT NULL,
                username TEXT NOT NULL,
                total_contributed REAL NOT NULL DEFAULT 0,
                total_expenses REAL NOT NULL DEFAULT 0,
                contribution_percentage REAL NOT NULL DEFAULT 0,
                last_updated TEXT NOT NULL,
                groceries REAL NOT NULL DEFAULT 0,
                utilities REAL NOT NULL DEFAULT 0,
                rent REAL NOT NULL DEFAULT 0,
                entertainment REAL NOT NULL DEFAULT 0,
                other REAL NOT NULL DEFAULT 0,
                PRIMARY KEY (room_id, username)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contribution_months (
                room_id TEXT NOT NULL,
                username TEXT NOT NULL,
                month TEXT NOT NULL,
                amount REAL NOT NULL DEFAULT 0,
                PRIMARY KEY (room_id, username, month)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wishlist_items (
                id TEXT PRIMARY KEY,
                room_id TEXT NOT NULL,
                username TEXT NOT NULL,
                item_name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                estimated_cost REAL NOT NULL,
                priority TEXT NOT NULL,
                category TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_wishlist_items_room_id
            ON wishlist_items(room_id, created_at DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // A single relation backs both the contributor list and the amount map
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wishlist_pledges (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                item_id TEXT NOT NULL,
                username TEXT NOT NULL,
                amount REAL NOT NULL,
                pledged_at TEXT NOT NULL,
                UNIQUE (item_id, username)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type AccountRepository = AccountRepository;
    type RoomRepository = RoomRepository;
    type ContributionRepository = ContributionRepository;
    type WishlistRepository = WishlistRepository;

    fn create_account_repository(&self) -> Self::AccountRepository {
        AccountRepository::new(self.clone())
    }

    fn create_room_repository(&self) -> Self::RoomRepository {
        RoomRepository::new(self.clone())
    }

    fn create_contribution_repository(&self) -> Self::ContributionRepository {
        ContributionRepository::new(self.clone())
    }

    fn create_wishlist_repository(&self) -> Self::WishlistRepository {
        WishlistRepository::new(self.clone())
    }
}
