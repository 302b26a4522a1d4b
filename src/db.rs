use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use novatv_backend::models::AdminConfig;

/// Run database migrations / 运行数据库迁移
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_config (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            data TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Seed default config on first run / 首次运行写入默认配置
    let default_config = serde_json::to_string(&AdminConfig::default())?;
    sqlx::query("INSERT OR IGNORE INTO admin_config (id, data, updated_at) VALUES (1, ?, ?)")
        .bind(&default_config)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(())
}

/// 管理配置存取 / Admin config store, one JSON snapshot row
#[derive(Clone)]
pub struct ConfigStore {
    pool: SqlitePool,
}

impl ConfigStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 读取当前配置快照 / Read the current snapshot
    pub async fn get(&self) -> Result<AdminConfig> {
        let row: Option<(String,)> = sqlx::query_as("SELECT data FROM admin_config WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((data,)) => Ok(serde_json::from_str(&data)?),
            None => Ok(AdminConfig::default()),
        }
    }

    /// 整体写入配置快照，最后写入者生效 / Replace the whole snapshot, last write wins
    pub async fn save(&self, config: &AdminConfig) -> Result<()> {
        let data = serde_json::to_string(config)?;
        sqlx::query(
            r#"
            INSERT INTO admin_config (id, data, updated_at) VALUES (1, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&data)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
