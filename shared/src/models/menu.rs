//! Menu catalog models

use serde::{Deserialize, Serialize};

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    pub is_active: bool,
}

/// Create menu category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategoryCreate {
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Update menu category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Optional add-on offered with a menu item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItemAddon {
    pub name: String,
    pub price: f64,
}

/// Menu item entity
///
/// The price here is the catalog price; orders snapshot it at add time, so
/// later menu edits never alter existing orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub category_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub addons: Vec<MenuItemAddon>,
    /// Maximum add-ons selectable per line, if limited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_addons: Option<u32>,
    pub is_active: bool,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub restaurant_id: String,
    pub category_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub addons: Vec<MenuItemAddon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_addons: Option<u32>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addons: Option<Vec<MenuItemAddon>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_addons: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
