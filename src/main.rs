use axum::{
    routing::{get, post},
    Router,
};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod db;
mod state;

use novatv_backend::config;
use state::{AppState, RuntimeEnv};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "novatv_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::load_config().expect("Failed to load configuration");
    tracing::info!(
        "Server will listen on {}:{}",
        app_config.server.host,
        app_config.server.port
    );

    // Create data directory if not exists / 创建数据目录
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| app_config.get_database_url());

    let pool = SqlitePool::connect(&database_url).await?;

    db::run_migrations(&pool).await?;

    let env = RuntimeEnv::resolve(&app_config);
    if env.storage_type == "localstorage" {
        tracing::warn!("存储模式为 localstorage，管理员配置接口不可用");
    }
    if env.owner_username.is_none() {
        tracing::warn!("未设置 OWNER_USERNAME，仅用户名册中的管理员可修改站点配置");
    }

    let state = Arc::new(AppState {
        config_store: db::ConfigStore::new(pool),
        env,
    });

    let app = Router::new()
        .route("/api/health", get(api::server::health_check))
        .route("/api/server-config", get(api::server::get_server_config))
        .route("/api/menu", get(api::menu::get_menu))
        .route("/api/admin/site", get(api::admin::get_site_config))
        .route("/api/admin/site", post(api::admin::update_site_config))
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
