use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use novatv_backend::menu::{is_active, resolve_nav_items, RuntimeConfig};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    /// 当前页面路径，用于激活态标记 / Current path for active marking
    pub active: Option<String>,
}

/// GET /api/menu - 根据站点配置推导导航菜单
pub async fn get_menu(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MenuQuery>,
) -> Json<Value> {
    // 配置读取失败时退回默认菜单，菜单推导本身没有错误态
    let config = state.config_store.get().await.unwrap_or_else(|e| {
        tracing::warn!("读取配置失败，使用默认菜单: {}", e);
        Default::default()
    });

    let runtime = RuntimeConfig {
        menu_settings: Some(config.site_config.menu_settings),
        custom_categories: config.custom_categories,
    };

    let items: Vec<Value> = resolve_nav_items(&runtime)
        .into_iter()
        .map(|item| {
            let active = params
                .active
                .as_deref()
                .map(|path| is_active(&item.href, path))
                .unwrap_or(false);
            json!({
                "icon": item.icon,
                "label": item.label,
                "href": item.href,
                "active": active,
            })
        })
        .collect();

    Json(json!({ "items": items }))
}
