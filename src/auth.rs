use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

pub const AUTH_COOKIE_NAME: &str = "auth";

/// 已解析的登录态，由认证服务签发，这里只消费
/// Resolved identity; issued elsewhere, only consumed here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthInfo {
    #[serde(default)]
    pub username: Option<String>,
}

/// 从 Cookie 中读取登录态 / Read auth info from the cookie
/// Cookie 值为 URL 编码的 JSON，解析失败视为未登录
pub fn get_auth_info_from_cookie(cookies: &Cookies) -> Option<AuthInfo> {
    let cookie = cookies.get(AUTH_COOKIE_NAME)?;
    let decoded = urlencoding::decode(cookie.value()).ok()?;
    serde_json::from_str(&decoded).ok()
}
