use crate::adapter::database_error::DatabaseError;
use sqlx::{MySql, Pool};
use tracing::info;

/// 適用順に並べたマイグレーション
const MIGRATIONS: [(&str, &str); 3] = [
    (
        "001_create_rooms_table",
        include_str!("../../migrations/001_create_rooms_table.sql"),
    ),
    (
        "002_create_reservations_table",
        include_str!("../../migrations/002_create_reservations_table.sql"),
    ),
    (
        "003_seed_rooms",
        include_str!("../../migrations/003_seed_rooms.sql"),
    ),
];

/// データベースマイグレーションを管理する構造体
pub struct DatabaseMigration {
    pool: Pool<MySql>,
}

impl DatabaseMigration {
    /// 新しいDatabaseMigrationインスタンスを作成
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// マイグレーションを実行
    /// べき等性を保証（CREATE TABLE IF NOT EXISTS / INSERT IGNORE）
    pub async fn run(&self) -> Result<(), DatabaseError> {
        for (name, migration_sql) in MIGRATIONS {
            info!(migration = name, "running migration");
            sqlx::query(migration_sql)
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::MigrationError(format!("{} failed: {}", name, e)))?;
        }

        info!(count = MIGRATIONS.len(), "all migrations completed");
        Ok(())
    }
}
