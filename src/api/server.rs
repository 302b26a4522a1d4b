use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use novatv_backend::models::{CustomCategory, SiteConfig};

use crate::state::AppState;

/// GET /api/health - 健康检查
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "NovaTV 服务运行正常"
    }))
}

/// 前端运行时配置 / Runtime config served to the frontend
#[derive(Debug, Serialize)]
pub struct ServerConfigResponse {
    #[serde(flatten)]
    pub site: SiteConfig,
    #[serde(rename = "CUSTOM_CATEGORIES")]
    pub custom_categories: Vec<CustomCategory>,
}

/// GET /api/server-config - 获取公开站点配置
pub async fn get_server_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServerConfigResponse>, StatusCode> {
    let config = state
        .config_store
        .get()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(ServerConfigResponse {
        site: config.site_config,
        custom_categories: config.custom_categories,
    }))
}
