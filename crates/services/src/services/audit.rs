use db::{DBService, models::site_log::SiteLog};
use uuid::Uuid;

use crate::services::mirror::CommitSnapshot;

/// Persists commit-derived audit records for site mutations.
#[derive(Clone)]
pub struct AuditRecorder {
    db: DBService,
}

impl AuditRecorder {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    /// Append one `logs_site` row describing the latest change to a site.
    pub async fn record(
        &self,
        site_id: Uuid,
        snapshot: &CommitSnapshot,
    ) -> Result<(), sqlx::Error> {
        let details = serde_json::json!({
            "site_id": site_id,
            "site_name": snapshot.site_name,
            "commit_message": snapshot.commit_message,
            "author_name": snapshot.author_name,
            "commit_time": snapshot.commit_time,
            "recent_committer_name": snapshot.recent_committer_name,
        });

        SiteLog::create(&self.db.pool, site_id, details).await?;

        tracing::debug!(site_id = %site_id, "recorded site audit entry");
        Ok(())
    }
}
