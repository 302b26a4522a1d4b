use serde::{Deserialize, Serialize};

/// 菜单可见性开关 / Menu visibility flags
/// 首页与搜索为固定项，不在此列 / Home and search are fixed, not configurable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuSettings {
    pub show_movies: bool,
    #[serde(rename = "showTVShows")]
    pub show_tv_shows: bool,
    pub show_anime: bool,
    pub show_variety: bool,
    pub show_live: bool,
    pub show_tvbox: bool,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            show_movies: true,
            show_tv_shows: true,
            show_anime: true,
            show_variety: true,
            show_live: false,
            show_tvbox: false,
        }
    }
}

/// 站点配置 / Public-facing site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiteConfig {
    pub site_name: String,
    pub announcement: String,
    pub search_downstream_max_page: i64,
    /// 接口缓存时间（秒）/ Interface cache time in seconds
    pub site_interface_cache_time: i64,
    pub douban_proxy_type: String,
    pub douban_proxy: String,
    pub douban_image_proxy_type: String,
    pub douban_image_proxy: String,
    pub disable_yellow_filter: bool,
    pub fluid_search: bool,
    #[serde(default)]
    pub menu_settings: MenuSettings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "NovaTV".to_string(),
            announcement: "本站所有内容均来自互联网公开接口，仅供学习交流使用。".to_string(),
            search_downstream_max_page: 5,
            site_interface_cache_time: 7200,
            douban_proxy_type: "direct".to_string(),
            douban_proxy: String::new(),
            douban_image_proxy_type: "direct".to_string(),
            douban_image_proxy: String::new(),
            disable_yellow_filter: false,
            fluid_search: true,
            menu_settings: MenuSettings::default(),
        }
    }
}

/// 用户角色 / User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub role: UserRole,
    #[serde(default)]
    pub banned: bool,
}

/// 用户名册 / User roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserConfig {
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

/// 自定义分类 / Custom category entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: String,
    pub query: String,
}

/// 管理配置快照 / Full administrative configuration snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminConfig {
    #[serde(default)]
    pub site_config: SiteConfig,
    #[serde(default)]
    pub user_config: UserConfig,
    #[serde(default)]
    pub custom_categories: Vec<CustomCategory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_config_uses_wire_field_names() {
        let value = serde_json::to_value(SiteConfig::default()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("SiteName"));
        assert!(obj.contains_key("SearchDownstreamMaxPage"));
        assert!(obj.contains_key("DisableYellowFilter"));
        let menu = obj.get("MenuSettings").unwrap().as_object().unwrap();
        assert!(menu.contains_key("showMovies"));
        assert!(menu.contains_key("showTVShows"));
        assert!(menu.contains_key("showTvbox"));
    }

    #[test]
    fn partial_menu_settings_fall_back_per_flag() {
        let menu: MenuSettings = serde_json::from_str(r#"{"showLive": true}"#).unwrap();
        assert!(menu.show_live);
        assert!(menu.show_movies);
        assert!(menu.show_tv_shows);
        assert!(!menu.show_tvbox);
    }

    #[test]
    fn user_entry_banned_defaults_to_false() {
        let user: UserEntry =
            serde_json::from_str(r#"{"username": "alice", "role": "admin"}"#).unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert!(!user.banned);
    }

    #[test]
    fn admin_config_tolerates_missing_sections() {
        let config: AdminConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AdminConfig::default());
    }
}
