use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::site::SiteError;
use services::services::mirror::MirrorError;
use thiserror::Error;
use utils::response::ApiResponse;

/// Request-level error. Every handler propagates into this with `?`; the
/// status mapping and the single log line both live here, at the pipeline
/// boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Site(#[from] SiteError),
    #[error(transparent)]
    Mirror(#[from] MirrorError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Unknown node/site ids and ownership mismatches reflect
            // caller-supplied input; only the store failing is on us.
            ApiError::Site(SiteError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Site(_) => StatusCode::BAD_REQUEST,
            ApiError::Mirror(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(ApiResponse::<()>::error(&self.to_string()))).into_response()
    }
}
