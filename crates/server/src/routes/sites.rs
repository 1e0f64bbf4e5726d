use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    node::Node,
    site::{CreateSite, Site, SiteError, SiteMetadata},
};
use serde::{Deserialize, Serialize};
use services::services::mirror::FolderMirrorClient;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CreateSiteRequest {
    #[serde(rename = "siteName")]
    pub site_name: Option<String>,
    #[serde(rename = "nodeID")]
    pub node_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSiteResponse {
    pub site_id: Uuid,
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSiteRequest {
    pub site_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSiteResponse {
    pub site_id: Uuid,
    pub site_name: String,
}

/// Look up a site and check that it belongs to the node named in the path.
async fn find_owned_site(
    state: &AppState,
    node_id: i64,
    site_id: Uuid,
) -> Result<Site, ApiError> {
    let site = Site::find_by_id(&state.db.pool, site_id)
        .await?
        .ok_or(SiteError::SiteNotFound)?;
    if site.node_id != node_id {
        return Err(SiteError::NodeMismatch.into());
    }
    Ok(site)
}

async fn resolve_repo_name(state: &AppState, node_id: i64) -> Result<String, ApiError> {
    let node = Node::find_by_id(&state.db.pool, node_id)
        .await?
        .ok_or(SiteError::NodeNotFound)?;
    Ok(node.node_name)
}

/// Shared tail of every mutating pipeline: look up the most recent commit and
/// append the audit row for it.
async fn snapshot_and_record(
    state: &AppState,
    repo_name: &str,
    site_name: &str,
    path_filter: Option<&str>,
    site_id: Uuid,
) -> Result<(), ApiError> {
    let snapshot = state
        .mirror
        .latest_commit(repo_name, site_name, path_filter)
        .await?;
    state.audit.record(site_id, &snapshot).await?;
    Ok(())
}

pub async fn create_site(
    State(state): State<AppState>,
    Json(payload): Json<CreateSiteRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<CreateSiteResponse>>), ApiError> {
    let site_name = payload
        .site_name
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_string();
    if site_name.is_empty() {
        return Err(ApiError::BadRequest("Site name is required".to_string()));
    }
    let node_id = payload
        .node_id
        .ok_or_else(|| ApiError::BadRequest("node_id is required".to_string()))?;

    let repo_name = resolve_repo_name(&state, node_id).await?;

    tracing::debug!(site_name = %site_name, node_id, "creating site");

    let site = Site::create(
        &state.db.pool,
        &CreateSite {
            node_id,
            site_name: site_name.clone(),
        },
        SiteMetadata::new(&site_name),
        Uuid::new_v4(),
    )
    .await?;

    state.mirror.create_folder(&repo_name, &site.site_name).await?;
    snapshot_and_record(&state, &repo_name, &site.site_name, None, site.site_id).await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(CreateSiteResponse {
            site_id: site.site_id,
            file_path: FolderMirrorClient::marker_path(&site.site_name),
        })),
    ))
}

pub async fn list_sites(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Vec<Site>>>, ApiError> {
    let sites = Site::find_by_node_id(&state.db.pool, node_id).await?;
    Ok(ResponseJson(ApiResponse::success(sites)))
}

pub async fn get_site(
    State(state): State<AppState>,
    Path((node_id, site_id)): Path<(i64, Uuid)>,
) -> Result<ResponseJson<ApiResponse<Site>>, ApiError> {
    let site = find_owned_site(&state, node_id, site_id).await?;
    Ok(ResponseJson(ApiResponse::success(site)))
}

pub async fn update_site(
    State(state): State<AppState>,
    Path((node_id, site_id)): Path<(i64, Uuid)>,
    Json(payload): Json<UpdateSiteRequest>,
) -> Result<ResponseJson<ApiResponse<UpdateSiteResponse>>, ApiError> {
    let site = find_owned_site(&state, node_id, site_id).await?;

    let new_name = payload
        .site_name
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_string();
    if new_name.is_empty() {
        return Err(ApiError::BadRequest(
            "New site name not provided".to_string(),
        ));
    }

    let repo_name = resolve_repo_name(&state, node_id).await?;

    state
        .mirror
        .rename_folder(&repo_name, &site.site_name, &new_name)
        .await?;

    Site::update(&state.db.pool, site_id, &new_name, SiteMetadata::new(&new_name)).await?;
    snapshot_and_record(&state, &repo_name, &new_name, Some(&new_name), site_id).await?;

    Ok(ResponseJson(ApiResponse::success(UpdateSiteResponse {
        site_id,
        site_name: new_name,
    })))
}

pub async fn delete_site(
    State(state): State<AppState>,
    Path((node_id, site_id)): Path<(i64, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let site = find_owned_site(&state, node_id, site_id).await?;
    let repo_name = resolve_repo_name(&state, node_id).await?;

    // Snapshot first: if the commit lookup fails, nothing has been deleted
    // yet and the request aborts cleanly.
    let snapshot = state
        .mirror
        .latest_commit(&repo_name, &site.site_name, Some(&site.site_name))
        .await?;

    state.mirror.delete_folder(&repo_name, &site.site_name).await?;
    Site::delete(&state.db.pool, site_id).await?;
    state.audit.record(site_id, &snapshot).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sites", post(create_site))
        .route("/nodes/{node_id}/sites", get(list_sites))
        .route(
            "/nodes/{node_id}/sites/{site_id}",
            get(get_site).put(update_site).delete(delete_site),
        )
}
