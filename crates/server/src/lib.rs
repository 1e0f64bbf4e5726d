use db::DBService;
use services::services::{audit::AuditRecorder, mirror::FolderMirrorClient};

pub mod config;
pub mod error;
pub mod routes;

/// Shared per-request dependencies, constructed once at startup and injected
/// into every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub mirror: FolderMirrorClient,
    pub audit: AuditRecorder,
}

impl AppState {
    pub fn new(db: DBService, mirror: FolderMirrorClient) -> Self {
        let audit = AuditRecorder::new(db.clone());
        Self { db, mirror, audit }
    }
}
