//! Staff repository

use redb::TableDefinition;

use crate::auth::pin;
use crate::db::{Db, DbError, DbResult};
use crate::utils::now_millis;
use shared::models::{Staff, StaffCreate, StaffUpdate};

const STAFF_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("staff");

pub struct StaffRepository {
    db: Db,
}

impl StaffRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a staff member; the raw PIN is hashed before storage and
    /// never persisted.
    pub fn create(&self, payload: StaffCreate) -> DbResult<Staff> {
        let pin_hash = pin::hash_pin(&payload.pin)
            .map_err(|e| DbError::Internal(format!("pin hashing failed: {}", e)))?;
        let staff = Staff {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: payload.restaurant_id,
            name: payload.name,
            login_id: payload.login_id,
            pin_hash,
            role: payload.role,
            is_active: true,
            created_at: now_millis(),
        };
        self.db.insert_json(STAFF_TABLE, &staff.id, &staff)?;
        Ok(staff)
    }

    pub fn find_by_id(&self, id: &str) -> DbResult<Option<Staff>> {
        self.db.fetch_json(STAFF_TABLE, id)
    }

    pub fn find_by_login(&self, restaurant_id: &str, login_id: &str) -> DbResult<Option<Staff>> {
        let all: Vec<Staff> = self.db.scan_json(STAFF_TABLE)?;
        Ok(all
            .into_iter()
            .find(|s| s.restaurant_id == restaurant_id && s.login_id == login_id))
    }

    pub fn find_by_restaurant(&self, restaurant_id: &str) -> DbResult<Vec<Staff>> {
        let all: Vec<Staff> = self.db.scan_json(STAFF_TABLE)?;
        Ok(all
            .into_iter()
            .filter(|s| s.restaurant_id == restaurant_id)
            .collect())
    }

    pub fn update(&self, id: &str, payload: StaffUpdate) -> DbResult<Staff> {
        let mut staff: Staff = self
            .db
            .fetch_json(STAFF_TABLE, id)?
            .ok_or_else(|| DbError::NotFound(format!("staff {}", id)))?;
        if let Some(name) = payload.name {
            staff.name = name;
        }
        if let Some(raw_pin) = payload.pin {
            staff.pin_hash = pin::hash_pin(&raw_pin)
                .map_err(|e| DbError::Internal(format!("pin hashing failed: {}", e)))?;
        }
        if let Some(role) = payload.role {
            staff.role = role;
        }
        if let Some(is_active) = payload.is_active {
            staff.is_active = is_active;
        }
        self.db.insert_json(STAFF_TABLE, id, &staff)?;
        Ok(staff)
    }

    pub fn delete(&self, id: &str) -> DbResult<bool> {
        self.db.remove(STAFF_TABLE, id)
    }
}
