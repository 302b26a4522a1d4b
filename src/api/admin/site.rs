use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_cookies::Cookies;

use novatv_backend::models::{MenuSettings, SiteConfig, UserEntry, UserRole};

use crate::api::error::AdminApiError;
use crate::auth::get_auth_info_from_cookie;
use crate::state::AppState;

/// 可配置的菜单开关键，showHome/showSearch 不可配置
const MENU_FLAG_KEYS: [&str; 6] = [
    "showMovies",
    "showTVShows",
    "showAnime",
    "showVariety",
    "showLive",
    "showTvbox",
];

/// 参数校验：所有字段必须齐全且类型正确，任一缺失或不符即整体拒绝
fn parse_site_payload(body: &Value) -> Option<SiteConfig> {
    let site_name = body.get("SiteName")?.as_str()?.to_string();
    let announcement = body.get("Announcement")?.as_str()?.to_string();
    let search_downstream_max_page = body.get("SearchDownstreamMaxPage")?.as_i64()?;
    let site_interface_cache_time = body.get("SiteInterfaceCacheTime")?.as_i64()?;
    let douban_proxy_type = body.get("DoubanProxyType")?.as_str()?.to_string();
    let douban_proxy = body.get("DoubanProxy")?.as_str()?.to_string();
    let douban_image_proxy_type = body.get("DoubanImageProxyType")?.as_str()?.to_string();
    let douban_image_proxy = body.get("DoubanImageProxy")?.as_str()?.to_string();
    let disable_yellow_filter = body.get("DisableYellowFilter")?.as_bool()?;
    let fluid_search = body.get("FluidSearch")?.as_bool()?;

    // MenuSettings 的六个开关逐个做布尔类型检查
    let menu = body.get("MenuSettings")?;
    for key in MENU_FLAG_KEYS {
        menu.get(key)?.as_bool()?;
    }

    // 校验通过后整体替换，缺省时回落到固定默认值
    let menu_settings: MenuSettings = body
        .get("MenuSettings")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();

    Some(SiteConfig {
        site_name,
        announcement,
        search_downstream_max_page,
        site_interface_cache_time,
        douban_proxy_type,
        douban_proxy,
        douban_image_proxy_type,
        douban_image_proxy,
        disable_yellow_filter,
        fluid_search,
        menu_settings,
    })
}

/// 权限校验：站长（环境变量指定）或名册中未封禁的管理员
fn is_authorized(username: &str, owner: Option<&str>, users: &[UserEntry]) -> bool {
    if owner == Some(username) {
        return true;
    }
    users
        .iter()
        .find(|u| u.username == username)
        .map(|u| u.role == UserRole::Admin && !u.banned)
        .unwrap_or(false)
}

/// GET /api/admin/site - 获取当前站点配置（需要管理员权限）
pub async fn get_site_config(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<SiteConfig>, AdminApiError> {
    if state.env.storage_type == "localstorage" {
        return Err(AdminApiError::StorageUnsupported);
    }

    let username = get_auth_info_from_cookie(&cookies)
        .and_then(|info| info.username)
        .ok_or(AdminApiError::Unauthorized)?;

    let admin_config = state
        .config_store
        .get()
        .await
        .map_err(|e| AdminApiError::Persistence(e.to_string()))?;

    if !is_authorized(
        &username,
        state.env.owner_username.as_deref(),
        &admin_config.user_config.users,
    ) {
        return Err(AdminApiError::Forbidden);
    }

    Ok(Json(admin_config.site_config))
}

/// POST /api/admin/site - 更新站点配置（需要管理员权限）
pub async fn update_site_config(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AdminApiError> {
    if state.env.storage_type == "localstorage" {
        return Err(AdminApiError::StorageUnsupported);
    }

    let username = get_auth_info_from_cookie(&cookies)
        .and_then(|info| info.username)
        .ok_or(AdminApiError::Unauthorized)?;

    let site_config = parse_site_payload(&body).ok_or(AdminApiError::InvalidPayload)?;

    let mut admin_config = state
        .config_store
        .get()
        .await
        .map_err(|e| AdminApiError::Persistence(e.to_string()))?;

    if !is_authorized(
        &username,
        state.env.owner_username.as_deref(),
        &admin_config.user_config.users,
    ) {
        return Err(AdminApiError::Forbidden);
    }

    // 整体替换站点配置，不做逐字段合并
    admin_config.site_config = site_config;

    state
        .config_store
        .save(&admin_config)
        .await
        .map_err(|e| AdminApiError::Persistence(e.to_string()))?;

    tracing::info!("站点配置已更新: operator={}", username);

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({ "ok": true })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use http_body_util::BodyExt;
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;
    use tower_cookies::CookieManagerLayer;

    use novatv_backend::models::AdminConfig;

    use crate::db::{run_migrations, ConfigStore};
    use crate::state::RuntimeEnv;

    fn roster() -> Vec<UserEntry> {
        vec![
            UserEntry {
                username: "alice".to_string(),
                role: UserRole::Admin,
                banned: false,
            },
            UserEntry {
                username: "bob".to_string(),
                role: UserRole::User,
                banned: false,
            },
            UserEntry {
                username: "carol".to_string(),
                role: UserRole::Admin,
                banned: true,
            },
        ]
    }

    async fn test_state(storage_type: &str) -> Arc<AppState> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();

        let store = ConfigStore::new(pool);
        let mut config = AdminConfig::default();
        config.user_config.users = roster();
        store.save(&config).await.unwrap();

        Arc::new(AppState {
            config_store: store,
            env: RuntimeEnv {
                storage_type: storage_type.to_string(),
                owner_username: Some("root".to_string()),
            },
        })
    }

    fn test_app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/admin/site", get(get_site_config))
            .route("/api/admin/site", post(update_site_config))
            .layer(CookieManagerLayer::new())
            .with_state(state)
    }

    fn auth_cookie(username: &str) -> String {
        let info = json!({ "username": username }).to_string();
        format!("auth={}", urlencoding::encode(&info))
    }

    fn valid_payload() -> Value {
        json!({
            "SiteName": "NovaTV",
            "Announcement": "站点公告",
            "SearchDownstreamMaxPage": 8,
            "SiteInterfaceCacheTime": 3600,
            "DoubanProxyType": "custom",
            "DoubanProxy": "https://proxy.example.com/fetch?url=",
            "DoubanImageProxyType": "direct",
            "DoubanImageProxy": "",
            "DisableYellowFilter": true,
            "FluidSearch": false,
            "MenuSettings": {
                "showMovies": false,
                "showTVShows": true,
                "showAnime": false,
                "showVariety": true,
                "showLive": true,
                "showTvbox": false
            }
        })
    }

    async fn post_site(app: &Router, cookie: Option<&str>, payload: &Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/admin/site")
            .header("content-type", "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let request = builder.body(Body::from(payload.to_string())).unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[test]
    fn payload_missing_field_is_rejected() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("Announcement");
        assert!(parse_site_payload(&payload).is_none());
    }

    #[test]
    fn payload_wrong_type_is_rejected() {
        let mut payload = valid_payload();
        payload["SearchDownstreamMaxPage"] = json!("8");
        assert!(parse_site_payload(&payload).is_none());

        let mut payload = valid_payload();
        payload["FluidSearch"] = json!(1);
        assert!(parse_site_payload(&payload).is_none());
    }

    #[test]
    fn payload_missing_menu_settings_is_rejected() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("MenuSettings");
        assert!(parse_site_payload(&payload).is_none());
    }

    #[test]
    fn payload_missing_menu_flag_is_rejected() {
        let mut payload = valid_payload();
        payload["MenuSettings"]
            .as_object_mut()
            .unwrap()
            .remove("showLive");
        assert!(parse_site_payload(&payload).is_none());
    }

    #[test]
    fn valid_payload_parses_exactly() {
        let parsed = parse_site_payload(&valid_payload()).unwrap();
        assert_eq!(parsed.site_name, "NovaTV");
        assert_eq!(parsed.search_downstream_max_page, 8);
        assert!(parsed.disable_yellow_filter);
        assert!(!parsed.menu_settings.show_movies);
        assert!(parsed.menu_settings.show_live);
    }

    #[test]
    fn authorization_rules() {
        let users = roster();
        assert!(is_authorized("root", Some("root"), &users));
        assert!(is_authorized("alice", Some("root"), &users));
        assert!(!is_authorized("bob", Some("root"), &users));
        assert!(!is_authorized("carol", Some("root"), &users));
        assert!(!is_authorized("mallory", Some("root"), &users));
        assert!(!is_authorized("root", None, &users));
    }

    #[tokio::test]
    async fn localstorage_mode_is_rejected_without_write() {
        let state = test_state("localstorage").await;
        let app = test_app(state.clone());
        let before = state.config_store.get().await.unwrap();

        let (status, body) = post_site(&app, Some(&auth_cookie("root")), &valid_payload()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let after = state.config_store.get().await.unwrap();
        assert_eq!(before.site_config, after.site_config);
    }

    #[tokio::test]
    async fn missing_identity_returns_401() {
        let state = test_state("sqlite").await;
        let app = test_app(state);

        let (status, body) = post_site(&app, None, &valid_payload()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn non_admin_and_banned_admin_are_rejected_without_write() {
        let state = test_state("sqlite").await;
        let app = test_app(state.clone());
        let before = state.config_store.get().await.unwrap();

        for user in ["bob", "carol", "mallory"] {
            let (status, _) = post_site(&app, Some(&auth_cookie(user)), &valid_payload()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} 应被拒绝", user);
        }

        let after = state.config_store.get().await.unwrap();
        assert_eq!(before.site_config, after.site_config);
    }

    #[tokio::test]
    async fn invalid_payload_returns_400_without_write() {
        let state = test_state("sqlite").await;
        let app = test_app(state.clone());
        let before = state.config_store.get().await.unwrap();

        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("SiteName");
        let (status, _) = post_site(&app, Some(&auth_cookie("root")), &payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let after = state.config_store.get().await.unwrap();
        assert_eq!(before.site_config, after.site_config);
    }

    #[tokio::test]
    async fn owner_update_replaces_site_config() {
        let state = test_state("sqlite").await;
        let app = test_app(state.clone());

        let (status, body) = post_site(&app, Some(&auth_cookie("root")), &valid_payload()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);

        let saved = state.config_store.get().await.unwrap();
        let expected = parse_site_payload(&valid_payload()).unwrap();
        assert_eq!(saved.site_config, expected);
        // 用户名册不受站点配置更新影响
        assert_eq!(saved.user_config.users, roster());
    }

    #[tokio::test]
    async fn admin_update_sets_no_store_header() {
        let state = test_state("sqlite").await;
        let app = test_app(state);

        let request = Request::builder()
            .method("POST")
            .uri("/api/admin/site")
            .header("content-type", "application/json")
            .header("cookie", auth_cookie("alice"))
            .body(Body::from(valid_payload().to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("cache-control")
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
    }

    #[tokio::test]
    async fn repeated_update_is_idempotent() {
        let state = test_state("sqlite").await;
        let app = test_app(state.clone());

        let (status, _) = post_site(&app, Some(&auth_cookie("root")), &valid_payload()).await;
        assert_eq!(status, StatusCode::OK);
        let first = state.config_store.get().await.unwrap();

        let (status, _) = post_site(&app, Some(&auth_cookie("root")), &valid_payload()).await;
        assert_eq!(status, StatusCode::OK);
        let second = state.config_store.get().await.unwrap();

        assert_eq!(first.site_config, second.site_config);
    }

    #[tokio::test]
    async fn admin_can_read_site_config() {
        let state = test_state("sqlite").await;
        let app = test_app(state);

        let request = Request::builder()
            .method("GET")
            .uri("/api/admin/site")
            .header("cookie", auth_cookie("alice"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["SiteName"], SiteConfig::default().site_name);
    }
}
