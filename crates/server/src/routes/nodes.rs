use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::node::{CreateNode, Node};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn create_node(
    State(state): State<AppState>,
    Json(payload): Json<CreateNode>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Node>>), ApiError> {
    if payload.node_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Node name is required".to_string()));
    }

    let node = Node::create(&state.db.pool, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(node))))
}

pub async fn get_nodes(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Node>>>, ApiError> {
    let nodes = Node::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(nodes)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/nodes", get(get_nodes).post(create_node))
}
