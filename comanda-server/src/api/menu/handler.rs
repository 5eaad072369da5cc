//! Menu catalog handlers
//!
//! Catalog edits never touch existing orders: line items snapshot name and
//! price at add time.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::db::repository::{MenuCategoryRepository, MenuItemRepository};
use crate::utils::{AppError, AppResult};
use shared::models::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemAddon,
    MenuItemCreate, MenuItemUpdate, StaffRole,
};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub addons: Vec<MenuItemAddon>,
    #[serde(default)]
    pub max_addons: Option<u32>,
}

// ========== Categories ==========

/// GET /api/menu/categories
pub async fn list_categories(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
) -> AppResult<Json<Vec<MenuCategory>>> {
    let categories =
        MenuCategoryRepository::new(state.db.clone()).find_by_restaurant(&staff.restaurant_id)?;
    Ok(Json(categories))
}

/// POST /api/menu/categories
pub async fn create_category(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Json(req): Json<CreateCategoryRequest>,
) -> AppResult<Json<MenuCategory>> {
    staff.require_role(StaffRole::Admin)?;
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Category name is required"));
    }
    let category = MenuCategoryRepository::new(state.db.clone()).create(MenuCategoryCreate {
        restaurant_id: staff.restaurant_id,
        name: req.name,
        sort_order: req.sort_order,
    })?;
    Ok(Json(category))
}

/// PUT /api/menu/categories/:id
pub async fn update_category(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
    Json(payload): Json<MenuCategoryUpdate>,
) -> AppResult<Json<MenuCategory>> {
    staff.require_role(StaffRole::Admin)?;
    Ok(Json(
        MenuCategoryRepository::new(state.db.clone()).update(&id, payload)?,
    ))
}

/// DELETE /api/menu/categories/:id
pub async fn delete_category(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    staff.require_role(StaffRole::Admin)?;
    Ok(Json(MenuCategoryRepository::new(state.db.clone()).delete(&id)?))
}

// ========== Items ==========

/// GET /api/menu/items
pub async fn list_items(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items =
        MenuItemRepository::new(state.db.clone()).find_by_restaurant(&staff.restaurant_id)?;
    Ok(Json(items))
}

/// POST /api/menu/items
pub async fn create_item(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Json(req): Json<CreateItemRequest>,
) -> AppResult<Json<MenuItem>> {
    staff.require_role(StaffRole::Admin)?;
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Item name is required"));
    }
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(AppError::validation("Price must be a non-negative number"));
    }
    let item = MenuItemRepository::new(state.db.clone()).create(MenuItemCreate {
        restaurant_id: staff.restaurant_id,
        category_id: req.category_id,
        name: req.name,
        description: req.description,
        price: req.price,
        addons: req.addons,
        max_addons: req.max_addons,
    })?;
    Ok(Json(item))
}

/// PUT /api/menu/items/:id
pub async fn update_item(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    staff.require_role(StaffRole::Admin)?;
    if let Some(price) = payload.price {
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::validation("Price must be a non-negative number"));
        }
    }
    Ok(Json(MenuItemRepository::new(state.db.clone()).update(&id, payload)?))
}

/// DELETE /api/menu/items/:id
pub async fn delete_item(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    staff.require_role(StaffRole::Admin)?;
    Ok(Json(MenuItemRepository::new(state.db.clone()).delete(&id)?))
}
