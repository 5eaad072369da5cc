//! Restaurant repository

use redb::TableDefinition;

use crate::db::{Db, DbResult};
use crate::utils::now_millis;
use shared::models::{Restaurant, RestaurantCreate};

const RESTAURANTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("restaurants");

pub struct RestaurantRepository {
    db: Db,
}

impl RestaurantRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn create(&self, payload: RestaurantCreate) -> DbResult<Restaurant> {
        let restaurant = Restaurant {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.name,
            owner_email: payload.owner_email,
            is_active: true,
            is_blocked: false,
            blocked_reason: None,
            blocked_at: None,
            created_at: now_millis(),
        };
        self.db
            .insert_json(RESTAURANTS_TABLE, &restaurant.id, &restaurant)?;
        Ok(restaurant)
    }

    pub fn find_by_id(&self, id: &str) -> DbResult<Option<Restaurant>> {
        self.db.fetch_json(RESTAURANTS_TABLE, id)
    }

    pub fn find_all(&self) -> DbResult<Vec<Restaurant>> {
        self.db.scan_json(RESTAURANTS_TABLE)
    }

    /// Block a restaurant (super-admin); staff of a blocked restaurant
    /// cannot log in.
    pub fn block(&self, id: &str, reason: String) -> DbResult<Restaurant> {
        let mut restaurant: Restaurant = self
            .db
            .fetch_json(RESTAURANTS_TABLE, id)?
            .ok_or_else(|| crate::db::DbError::NotFound(format!("restaurant {}", id)))?;
        restaurant.is_blocked = true;
        restaurant.blocked_reason = Some(reason);
        restaurant.blocked_at = Some(now_millis());
        self.db.insert_json(RESTAURANTS_TABLE, id, &restaurant)?;
        Ok(restaurant)
    }

    pub fn unblock(&self, id: &str) -> DbResult<Restaurant> {
        let mut restaurant: Restaurant = self
            .db
            .fetch_json(RESTAURANTS_TABLE, id)?
            .ok_or_else(|| crate::db::DbError::NotFound(format!("restaurant {}", id)))?;
        restaurant.is_blocked = false;
        restaurant.blocked_reason = None;
        restaurant.blocked_at = None;
        self.db.insert_json(RESTAURANTS_TABLE, id, &restaurant)?;
        Ok(restaurant)
    }
}
