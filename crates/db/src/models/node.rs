use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// A tenant-level entity mapped 1:1 to a repository on the hosting service.
/// `node_name` doubles as the repository name.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Node {
    pub node_id: i64,
    pub node_name: String,
    pub node_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNode {
    pub node_name: String,
    pub node_description: Option<String>,
}

impl Node {
    pub async fn find_by_id(pool: &SqlitePool, node_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Node>(
            r#"SELECT node_id, node_name, node_description, created_at
               FROM nodes
               WHERE node_id = $1"#,
        )
        .bind(node_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Node>(
            r#"SELECT node_id, node_name, node_description, created_at
               FROM nodes
               ORDER BY node_id ASC"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn create(pool: &SqlitePool, data: &CreateNode) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Node>(
            r#"INSERT INTO nodes (node_name, node_description)
               VALUES ($1, $2)
               RETURNING node_id, node_name, node_description, created_at"#,
        )
        .bind(&data.node_name)
        .bind(&data.node_description)
        .fetch_one(pool)
        .await
    }
}
