//! Activity log
//!
//! Append-only record of staff actions. Entries are written best-effort:
//! a logging failure is traced but never fails the action that produced it.

use redb::TableDefinition;
use tracing::error;

use crate::db::{Db, DbResult};
use crate::utils::now_millis;
use shared::models::{ActivityAction, ActivityEntry};

const ACTIVITY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("activity_log");

/// Activity log service
#[derive(Clone)]
pub struct ActivityLog {
    db: Db,
}

impl ActivityLog {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Record an entry; failures are logged, not propagated.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        restaurant_id: &str,
        staff_id: &str,
        staff_name: &str,
        action: ActivityAction,
        entity_type: &str,
        entity_id: &str,
        details: Option<String>,
    ) {
        let entry = ActivityEntry {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: restaurant_id.to_string(),
            staff_id: staff_id.to_string(),
            staff_name: staff_name.to_string(),
            action,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            details,
            created_at: now_millis(),
        };
        if let Err(e) = self.db.insert_json(ACTIVITY_TABLE, &entry.id, &entry) {
            error!(error = %e, action = ?action, "Failed to record activity entry");
        }
    }

    /// Entries for a restaurant, newest first
    pub fn list(&self, restaurant_id: &str, limit: usize) -> DbResult<Vec<ActivityEntry>> {
        let mut entries: Vec<ActivityEntry> = self
            .db
            .scan_json(ACTIVITY_TABLE)?
            .into_iter()
            .filter(|e: &ActivityEntry| e.restaurant_id == restaurant_id)
            .collect();
        entries.sort_by_key(|e| std::cmp::Reverse(e.created_at));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_lists_newest_first() {
        let log = ActivityLog::new(Db::open_in_memory().unwrap());
        log.record(
            "rest-1",
            "staff-1",
            "Ana",
            ActivityAction::ItemRemoved,
            "Order",
            "order-1",
            Some("Item removed: Picanha (2x)".to_string()),
        );
        log.record(
            "rest-1",
            "staff-1",
            "Ana",
            ActivityAction::OrderPaid,
            "Order",
            "order-1",
            None,
        );

        let entries = log.list("rest-1", 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(log.list("rest-2", 10).unwrap().is_empty());
    }
}
