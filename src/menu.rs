//! Navigation menu derivation / 导航菜单推导
//!
//! Derives the navigation item list from menu visibility flags. All functions
//! are pure: missing or malformed configuration falls back to defaults and
//! rendering is never blocked.

use serde::{Deserialize, Serialize};

use crate::models::{CustomCategory, MenuSettings};

/// 图标标识，由渲染层解析 / Icon identifiers resolved by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavIcon {
    Home,
    Search,
    Film,
    Tv,
    Cat,
    Clover,
    Radio,
    Box,
    Star,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub icon: NavIcon,
    pub label: String,
    pub href: String,
}

impl NavItem {
    pub fn new(icon: NavIcon, label: &str, href: &str) -> Self {
        Self {
            icon,
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// 运行时配置，显式传入解析器 / Runtime config passed explicitly to the resolver
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeConfig {
    #[serde(rename = "MenuSettings")]
    pub menu_settings: Option<MenuSettings>,
    #[serde(rename = "CUSTOM_CATEGORIES", default)]
    pub custom_categories: Vec<CustomCategory>,
}

/// 固定项：首页与搜索 / Fixed items: home and search
pub fn fixed_nav_items() -> Vec<NavItem> {
    vec![
        NavItem::new(NavIcon::Home, "首页", "/"),
        NavItem::new(NavIcon::Search, "搜索", "/search"),
    ]
}

/// 按声明顺序推导可配置项 / Derive configurable items in declared order
pub fn derived_nav_items(menu: &MenuSettings) -> Vec<NavItem> {
    let mut items = Vec::new();

    if menu.show_movies {
        items.push(NavItem::new(NavIcon::Film, "电影", "/douban?type=movie"));
    }
    if menu.show_tv_shows {
        items.push(NavItem::new(NavIcon::Tv, "剧集", "/douban?type=tv"));
    }
    if menu.show_anime {
        items.push(NavItem::new(NavIcon::Cat, "动漫", "/douban?type=anime"));
    }
    if menu.show_variety {
        items.push(NavItem::new(NavIcon::Clover, "综艺", "/douban?type=show"));
    }
    if menu.show_live {
        items.push(NavItem::new(NavIcon::Radio, "直播", "/live"));
    }
    if menu.show_tvbox {
        items.push(NavItem::new(NavIcon::Box, "tvbox", "/tvbox"));
    }

    items
}

/// 重算导航：保留固定项，整体替换派生尾部
/// Recompute: keep fixed items, replace the whole derived tail
pub fn rebuild_nav_items(prev: &[NavItem], menu: &MenuSettings) -> Vec<NavItem> {
    let mut items: Vec<NavItem> = prev
        .iter()
        .filter(|item| item.href == "/" || item.href == "/search")
        .cloned()
        .collect();
    items.extend(derived_nav_items(menu));
    items
}

/// 自定义分类非空时追加入口，幂等 / Append custom-category entry once, idempotent
pub fn append_custom_category(items: &mut Vec<NavItem>, custom_categories: &[CustomCategory]) {
    if custom_categories.is_empty() {
        return;
    }
    if items.iter().any(|item| item.href == "/douban?type=custom") {
        return;
    }
    items.push(NavItem::new(NavIcon::Star, "自定义", "/douban?type=custom"));
}

/// 从运行时配置推导完整导航列表 / Full derivation from runtime config
pub fn resolve_nav_items(config: &RuntimeConfig) -> Vec<NavItem> {
    let menu = config.menu_settings.clone().unwrap_or_default();
    let mut items = rebuild_nav_items(&fixed_nav_items(), &menu);
    append_custom_category(&mut items, &config.custom_categories);
    items
}

/// 判断导航项是否激活：解码后完全相等，或同属 /douban 且 type 参数一致
pub fn is_active(href: &str, current: &str) -> bool {
    let type_param = href
        .split_once("type=")
        .map(|(_, rest)| rest.split('&').next().unwrap_or(""))
        .filter(|t| !t.is_empty());

    let decoded_current = decode_lossy(current);
    let decoded_href = decode_lossy(href);

    if decoded_current == decoded_href {
        return true;
    }

    match type_param {
        Some(t) => {
            decoded_current.starts_with("/douban")
                && decoded_current.contains(&format!("type={}", t))
        }
        None => false,
    }
}

fn decode_lossy(input: &str) -> String {
    urlencoding::decode(input)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| input.to_string())
}
