use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Site not found")]
    SiteNotFound,
    #[error("Node not found")]
    NodeNotFound,
    #[error("Mismatched node_id values")]
    NodeMismatch,
}

/// A managed folder/path inside the repository of its owning node.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Site {
    pub site_id: Uuid,
    pub node_id: i64,
    pub site_name: String,
    pub site_metadata: Json<SiteMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Structured document stored alongside every site row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub sitename: String,
    pub sitepath: String,
}

impl SiteMetadata {
    /// Derive the canonical metadata for a site name; the path is always
    /// `/{site_name}`.
    pub fn new(site_name: &str) -> Self {
        Self {
            sitename: site_name.to_string(),
            sitepath: format!("/{site_name}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSite {
    pub node_id: i64,
    pub site_name: String,
}

impl Site {
    pub async fn find_by_id(pool: &SqlitePool, site_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Site>(
            r#"SELECT site_id, node_id, site_name, site_metadata, created_at, updated_at
               FROM sites
               WHERE site_id = $1"#,
        )
        .bind(site_id)
        .fetch_optional(pool)
        .await
    }

    /// All sites belonging to a node; an empty vec when there are none.
    pub async fn find_by_node_id(pool: &SqlitePool, node_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Site>(
            r#"SELECT site_id, node_id, site_name, site_metadata, created_at, updated_at
               FROM sites
               WHERE node_id = $1
               ORDER BY created_at ASC"#,
        )
        .bind(node_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateSite,
        metadata: SiteMetadata,
        site_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Site>(
            r#"INSERT INTO sites (site_id, node_id, site_name, site_metadata)
               VALUES ($1, $2, $3, $4)
               RETURNING site_id, node_id, site_name, site_metadata, created_at, updated_at"#,
        )
        .bind(site_id)
        .bind(data.node_id)
        .bind(&data.site_name)
        .bind(Json(metadata))
        .fetch_one(pool)
        .await
    }

    /// Returns the number of rows affected: zero when the site does not
    /// exist. Callers are expected to have validated existence already.
    pub async fn update(
        pool: &SqlitePool,
        site_id: Uuid,
        site_name: &str,
        metadata: SiteMetadata,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE sites
               SET site_name = $2, site_metadata = $3, updated_at = datetime('now', 'subsec')
               WHERE site_id = $1"#,
        )
        .bind(site_id)
        .bind(site_name)
        .bind(Json(metadata))
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Same zero-rows-affected semantics as [`Site::update`].
    pub async fn delete(pool: &SqlitePool, site_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sites WHERE site_id = $1")
            .bind(site_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
