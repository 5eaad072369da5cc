//! Test fixtures shared by action and applier tests

use redb::WriteTransaction;

use super::storage::OrderStorage;
use super::traits::CommandMetadata;
use shared::models::{DiningTable, TableStatus};
use shared::order::{LineItemInput, LineItemSnapshot, OrderSnapshot, OrderStatus};

pub fn create_test_metadata() -> CommandMetadata {
    CommandMetadata {
        command_id: "cmd-1".to_string(),
        operator_id: "staff-1".to_string(),
        operator_name: "Ana".to_string(),
        timestamp: 1234567890,
    }
}

pub fn create_test_table(id: &str, number: u32) -> DiningTable {
    DiningTable {
        id: id.to_string(),
        restaurant_id: "rest-1".to_string(),
        number,
        status: TableStatus::Free,
        current_order_id: None,
        current_waiter_id: None,
        created_at: 0,
    }
}

pub fn create_line_item_input(item_id: &str, name: &str, price: f64, quantity: u32) -> LineItemInput {
    LineItemInput {
        item_id: item_id.to_string(),
        name: name.to_string(),
        price,
        quantity,
        notes: None,
        addons: vec![],
    }
}

pub fn create_line_item_snapshot(
    line_id: &str,
    name: &str,
    price: f64,
    quantity: u32,
) -> LineItemSnapshot {
    LineItemSnapshot {
        line_id: line_id.to_string(),
        item_id: "item-1".to_string(),
        name: name.to_string(),
        price,
        base_price: price,
        quantity,
        notes: None,
        addons: vec![],
        added_at: 0,
    }
}

/// Store an order snapshot and, when OPEN, wire up the table/active indices
/// the way the manager would.
pub fn open_test_order(
    storage: &OrderStorage,
    txn: &WriteTransaction,
    order_id: &str,
    table_id: &str,
    status: OrderStatus,
) -> OrderSnapshot {
    let mut snapshot = OrderSnapshot::new(order_id.to_string());
    snapshot.restaurant_id = "rest-1".to_string();
    snapshot.table_id = table_id.to_string();
    snapshot.table_number = 7;
    snapshot.waiter_id = "staff-1".to_string();
    snapshot.waiter_name = "Ana".to_string();
    snapshot.status = status;
    storage.store_snapshot(txn, &snapshot).unwrap();
    if status == OrderStatus::Open {
        storage.link_table_order(txn, table_id, order_id).unwrap();
        storage.mark_order_active(txn, order_id).unwrap();
    }
    snapshot
}
