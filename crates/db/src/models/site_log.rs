use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use uuid::Uuid;

/// One audit row in `logs_site`. Append-only: rows are never updated or
/// deleted, and they survive deletion of the site they reference.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SiteLog {
    pub id: Uuid,
    pub site_id: Uuid,
    pub details: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl SiteLog {
    pub async fn create(
        pool: &SqlitePool,
        site_id: Uuid,
        details: serde_json::Value,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, SiteLog>(
            r#"INSERT INTO logs_site (id, site_id, details)
               VALUES ($1, $2, $3)
               RETURNING id, site_id, details, created_at"#,
        )
        .bind(id)
        .bind(site_id)
        .bind(Json(details))
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_site_id(
        pool: &SqlitePool,
        site_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SiteLog>(
            r#"SELECT id, site_id, details, created_at
               FROM logs_site
               WHERE site_id = $1
               ORDER BY created_at ASC"#,
        )
        .bind(site_id)
        .fetch_all(pool)
        .await
    }
}
