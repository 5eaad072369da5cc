//! Menu catalog repositories

use redb::TableDefinition;

use crate::db::{Db, DbError, DbResult};
use shared::models::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemCreate,
    MenuItemUpdate,
};

const CATEGORIES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu_categories");
const ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu_items");

pub struct MenuCategoryRepository {
    db: Db,
}

impl MenuCategoryRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn create(&self, payload: MenuCategoryCreate) -> DbResult<MenuCategory> {
        let category = MenuCategory {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: payload.restaurant_id,
            name: payload.name,
            sort_order: payload.sort_order,
            is_active: true,
        };
        self.db
            .insert_json(CATEGORIES_TABLE, &category.id, &category)?;
        Ok(category)
    }

    pub fn find_by_restaurant(&self, restaurant_id: &str) -> DbResult<Vec<MenuCategory>> {
        let mut categories: Vec<MenuCategory> = self
            .db
            .scan_json(CATEGORIES_TABLE)?
            .into_iter()
            .filter(|c: &MenuCategory| c.restaurant_id == restaurant_id)
            .collect();
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }

    pub fn update(&self, id: &str, payload: MenuCategoryUpdate) -> DbResult<MenuCategory> {
        let mut category: MenuCategory = self
            .db
            .fetch_json(CATEGORIES_TABLE, id)?
            .ok_or_else(|| DbError::NotFound(format!("menu category {}", id)))?;
        if let Some(name) = payload.name {
            category.name = name;
        }
        if let Some(sort_order) = payload.sort_order {
            category.sort_order = sort_order;
        }
        if let Some(is_active) = payload.is_active {
            category.is_active = is_active;
        }
        self.db.insert_json(CATEGORIES_TABLE, id, &category)?;
        Ok(category)
    }

    pub fn delete(&self, id: &str) -> DbResult<bool> {
        self.db.remove(CATEGORIES_TABLE, id)
    }
}

pub struct MenuItemRepository {
    db: Db,
}

impl MenuItemRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn create(&self, payload: MenuItemCreate) -> DbResult<MenuItem> {
        let item = MenuItem {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: payload.restaurant_id,
            category_id: payload.category_id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            addons: payload.addons,
            max_addons: payload.max_addons,
            is_active: true,
        };
        self.db.insert_json(ITEMS_TABLE, &item.id, &item)?;
        Ok(item)
    }

    pub fn find_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        self.db.fetch_json(ITEMS_TABLE, id)
    }

    /// Active items for a restaurant (the order-taking search path)
    pub fn find_active(&self, restaurant_id: &str) -> DbResult<Vec<MenuItem>> {
        let all: Vec<MenuItem> = self.db.scan_json(ITEMS_TABLE)?;
        Ok(all
            .into_iter()
            .filter(|i| i.restaurant_id == restaurant_id && i.is_active)
            .collect())
    }

    pub fn find_by_restaurant(&self, restaurant_id: &str) -> DbResult<Vec<MenuItem>> {
        let all: Vec<MenuItem> = self.db.scan_json(ITEMS_TABLE)?;
        Ok(all
            .into_iter()
            .filter(|i| i.restaurant_id == restaurant_id)
            .collect())
    }

    pub fn update(&self, id: &str, payload: MenuItemUpdate) -> DbResult<MenuItem> {
        let mut item: MenuItem = self
            .db
            .fetch_json(ITEMS_TABLE, id)?
            .ok_or_else(|| DbError::NotFound(format!("menu item {}", id)))?;
        if let Some(category_id) = payload.category_id {
            item.category_id = category_id;
        }
        if let Some(name) = payload.name {
            item.name = name;
        }
        if let Some(description) = payload.description {
            item.description = Some(description);
        }
        if let Some(price) = payload.price {
            item.price = price;
        }
        if let Some(addons) = payload.addons {
            item.addons = addons;
        }
        if let Some(max_addons) = payload.max_addons {
            item.max_addons = Some(max_addons);
        }
        if let Some(is_active) = payload.is_active {
            item.is_active = is_active;
        }
        self.db.insert_json(ITEMS_TABLE, id, &item)?;
        Ok(item)
    }

    pub fn delete(&self, id: &str) -> DbResult<bool> {
        self.db.remove(ITEMS_TABLE, id)
    }
}
