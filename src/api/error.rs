use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 管理接口错误分类 / Admin API error taxonomy
/// 校验与权限错误只带固定文案，不透出字段级细节
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// 本地存储模式下无持久后端可写
    #[error("不支持本地存储进行管理员配置")]
    StorageUnsupported,
    /// 无法解析调用者身份
    #[error("Unauthorized")]
    Unauthorized,
    /// 已登录但非管理员或已封禁
    #[error("权限不足")]
    Forbidden,
    /// 请求体字段缺失或类型错误
    #[error("参数格式错误")]
    InvalidPayload,
    /// 配置写入失败，details 保留底层错误信息
    #[error("更新站点配置失败")]
    Persistence(String),
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            Self::StorageUnsupported | Self::InvalidPayload => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            // 未登录与权限不足均返回 401
            Self::Unauthorized | Self::Forbidden => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            Self::Persistence(details) => {
                tracing::error!("更新站点配置失败: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message, "details": details })),
                )
                    .into_response()
            }
        }
    }
}
