//! End-to-end order lifecycle flows
//!
//! Drives the full stack (manager, table registry, ticket dispatcher)
//! through realistic service scenarios over one shared in-memory database.

use comanda_server::auth::JwtConfig;
use comanda_server::db::Db;
use comanda_server::{Config, ServerState};
use shared::models::{DiningTableCreate, TableStatus, TicketStatus};
use shared::order::{
    CommandErrorCode, CommandResponse, LineItemInput, OrderCommand, OrderCommandPayload,
    OrderStatus, PaymentMethod,
};

fn test_config() -> Config {
    Config {
        work_dir: "./unused".to_string(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "test-secret-test-secret-test-secret".to_string(),
            expiration_minutes: 60,
            issuer: "comanda-server".to_string(),
        },
        environment: "test".to_string(),
        shutdown_timeout_ms: 1000,
        super_admin_token: None,
    }
}

fn test_state() -> ServerState {
    let db = Db::open_in_memory().expect("in-memory db");
    ServerState::with_db(&test_config(), db).expect("state")
}

fn command(payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand {
        command_id: uuid::Uuid::new_v4().to_string(),
        restaurant_id: "rest-1".to_string(),
        operator_id: "staff-1".to_string(),
        operator_name: "Ana".to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        payload,
    }
}

fn item(name: &str, price: f64, quantity: u32) -> LineItemInput {
    LineItemInput {
        item_id: format!("item-{}", name.to_lowercase()),
        name: name.to_string(),
        price,
        quantity,
        notes: None,
        addons: vec![],
    }
}

fn create_table(state: &ServerState, number: u32) -> String {
    state
        .tables
        .create(DiningTableCreate {
            restaurant_id: "rest-1".to_string(),
            number,
        })
        .expect("table created")
        .id
}

fn add_items(state: &ServerState, table_id: &str, items: Vec<LineItemInput>) -> CommandResponse {
    state.orders.execute_command(command(OrderCommandPayload::AddItems {
        table_id: table_id.to_string(),
        items,
    }))
}

#[tokio::test]
async fn first_item_add_opens_order_and_dispatches_one_ticket() {
    let state = test_state();
    let table_id = create_table(&state, 7);

    // 2x 20.00 + 1x 15.00 -> 55.00 + 10% fee
    let response = add_items(
        &state,
        &table_id,
        vec![item("Picanha", 20.0, 2), item("Farofa", 15.0, 1)],
    );
    assert!(response.success);
    let order_id = response.order_id.expect("order opened");
    let ticket_id = response.ticket_id.expect("ticket dispatched");

    let snapshot = state.orders.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Open);
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.subtotal, 55.0);
    assert_eq!(snapshot.service_fee, 5.50);
    assert_eq!(snapshot.total, 60.50);

    let table = state.tables.get(&table_id).unwrap();
    assert_eq!(table.status, TableStatus::InUse);
    assert_eq!(table.current_order_id.as_deref(), Some(order_id.as_str()));

    // Exactly one ticket, carrying only this batch
    let tickets = state.tickets.list_for_order(&order_id).unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].id, ticket_id);
    assert_eq!(tickets[0].status, TicketStatus::New);
    assert_eq!(tickets[0].items.len(), 2);
    assert_eq!(tickets[0].table_number, 7);
}

#[tokio::test]
async fn one_open_order_per_table() {
    let state = test_state();
    let table_id = create_table(&state, 3);

    let first = add_items(&state, &table_id, vec![item("Coffee", 4.0, 1)]);
    let second = add_items(&state, &table_id, vec![item("Cake", 12.0, 1)]);

    assert_eq!(first.order_id, second.order_id);
    let order_id = first.order_id.unwrap();

    // Two batches -> two tickets on the same order
    let tickets = state.tickets.list_for_order(&order_id).unwrap();
    assert_eq!(tickets.len(), 2);

    let snapshot = state.orders.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.subtotal, 16.0);
}

#[tokio::test]
async fn checkout_applies_ten_percent_fee_and_frees_the_table() {
    let state = test_state();
    let table_id = create_table(&state, 5);
    let order_id = add_items(&state, &table_id, vec![item("Rodizio", 50.0, 2)])
        .order_id
        .unwrap();

    let response = state
        .orders
        .execute_command(command(OrderCommandPayload::Checkout {
            order_id: order_id.clone(),
            payment_method: PaymentMethod::CreditCard,
            waive_service_fee: false,
        }));
    assert!(response.success);

    let snapshot = state.orders.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Paid);
    assert_eq!(snapshot.subtotal, 100.0);
    assert_eq!(snapshot.service_fee, 10.0);
    assert_eq!(snapshot.total, 110.0);
    let payment = snapshot.payment.expect("payment metadata");
    assert_eq!(payment.method, PaymentMethod::CreditCard);
    assert_eq!(payment.paid_by, "staff-1");

    let table = state.tables.get(&table_id).unwrap();
    assert_eq!(table.status, TableStatus::Free);
    assert_eq!(table.current_order_id, None);
    assert_eq!(table.current_waiter_id, None);
}

#[tokio::test]
async fn waived_fee_checkout_settles_at_subtotal() {
    let state = test_state();
    let table_id = create_table(&state, 5);
    let order_id = add_items(&state, &table_id, vec![item("Rodizio", 50.0, 2)])
        .order_id
        .unwrap();

    let response = state
        .orders
        .execute_command(command(OrderCommandPayload::Checkout {
            order_id: order_id.clone(),
            payment_method: PaymentMethod::Cash,
            waive_service_fee: true,
        }));
    assert!(response.success);

    // Waived fee on subtotal 100.00 settles at exactly 100.00
    let snapshot = state.orders.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.subtotal, 100.0);
    assert_eq!(snapshot.service_fee, 0.0);
    assert_eq!(snapshot.total, 100.0);
}

#[tokio::test]
async fn cancel_requires_a_reason_and_cascades_to_tickets() {
    let state = test_state();
    let table_id = create_table(&state, 9);
    let order_id = add_items(&state, &table_id, vec![item("Moqueca", 45.0, 1)])
        .order_id
        .unwrap();

    // Blank reasons are rejected and the order stays open
    for reason in ["", "   "] {
        let response = state
            .orders
            .execute_command(command(OrderCommandPayload::CancelOrder {
                order_id: order_id.clone(),
                reason: reason.to_string(),
            }));
        assert!(!response.success);
        assert_eq!(
            response.error.unwrap().code,
            CommandErrorCode::ReasonRequired
        );
        let snapshot = state.orders.get_snapshot(&order_id).unwrap().unwrap();
        assert_eq!(snapshot.status, OrderStatus::Open);
        assert_eq!(state.tables.get(&table_id).unwrap().status, TableStatus::InUse);
    }

    let response = state
        .orders
        .execute_command(command(OrderCommandPayload::CancelOrder {
            order_id: order_id.clone(),
            reason: "customer left".to_string(),
        }));
    assert!(response.success);

    let snapshot = state.orders.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Cancelled);
    let cancellation = snapshot.cancellation.expect("cancellation metadata");
    assert_eq!(cancellation.reason, "customer left");

    assert_eq!(state.tables.get(&table_id).unwrap().status, TableStatus::Free);
    for ticket in state.tickets.list_for_order(&order_id).unwrap() {
        assert_eq!(ticket.status, TicketStatus::Cancelled);
        assert!(ticket.cancelled_at.is_some());
    }
}

#[tokio::test]
async fn remove_item_recomputes_totals_and_shrinks_the_right_ticket() {
    let state = test_state();
    let table_id = create_table(&state, 2);
    let order_id = add_items(
        &state,
        &table_id,
        // Two identical lines in one batch: removal must hit exactly one
        vec![item("Coffee", 4.0, 1), item("Coffee", 4.0, 1), item("Cake", 12.0, 1)],
    )
    .order_id
    .unwrap();

    let before = state.orders.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(before.subtotal, 20.0);
    let target = before.items[0].line_id.clone();
    let kept: Vec<String> = before.items[1..].iter().map(|i| i.line_id.clone()).collect();

    let response = state
        .orders
        .execute_command(command(OrderCommandPayload::RemoveItem {
            order_id: order_id.clone(),
            line_id: target.clone(),
            reason: Some("wrong item".to_string()),
        }));
    assert!(response.success);

    let after = state.orders.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(after.items.len(), 2);
    assert!(after.items.iter().all(|i| i.line_id != target));
    assert_eq!(
        after.items.iter().map(|i| i.line_id.clone()).collect::<Vec<_>>(),
        kept
    );
    assert_eq!(after.subtotal, 16.0);
    assert_eq!(after.service_fee, 1.60);
    assert_eq!(after.total, 17.60);

    let tickets = state.tickets.list_for_order(&order_id).unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].items.len(), 2);
    assert!(tickets[0].items.iter().all(|i| i.line_id != target));
}

#[tokio::test]
async fn checkout_on_emptied_order_is_rejected() {
    let state = test_state();
    let table_id = create_table(&state, 4);
    let order_id = add_items(&state, &table_id, vec![item("Coffee", 4.0, 1)])
        .order_id
        .unwrap();
    let line_id = state
        .orders
        .get_snapshot(&order_id)
        .unwrap()
        .unwrap()
        .items[0]
        .line_id
        .clone();

    assert!(state
        .orders
        .execute_command(command(OrderCommandPayload::RemoveItem {
            order_id: order_id.clone(),
            line_id,
            reason: None,
        }))
        .success);

    let response = state
        .orders
        .execute_command(command(OrderCommandPayload::Checkout {
            order_id: order_id.clone(),
            payment_method: PaymentMethod::Cash,
            waive_service_fee: false,
        }));
    assert!(!response.success);
    assert_eq!(response.error.unwrap().code, CommandErrorCode::EmptyOrder);
}

#[tokio::test]
async fn paid_orders_reject_further_mutation() {
    let state = test_state();
    let table_id = create_table(&state, 6);
    let order_id = add_items(&state, &table_id, vec![item("Feijoada", 35.0, 1)])
        .order_id
        .unwrap();
    let line_id = state
        .orders
        .get_snapshot(&order_id)
        .unwrap()
        .unwrap()
        .items[0]
        .line_id
        .clone();

    assert!(state
        .orders
        .execute_command(command(OrderCommandPayload::Checkout {
            order_id: order_id.clone(),
            payment_method: PaymentMethod::Pix,
            waive_service_fee: false,
        }))
        .success);

    let remove = state
        .orders
        .execute_command(command(OrderCommandPayload::RemoveItem {
            order_id: order_id.clone(),
            line_id,
            reason: None,
        }));
    assert!(!remove.success);
    assert_eq!(remove.error.unwrap().code, CommandErrorCode::OrderNotOpen);

    let cancel = state
        .orders
        .execute_command(command(OrderCommandPayload::CancelOrder {
            order_id: order_id.clone(),
            reason: "too late".to_string(),
        }));
    assert!(!cancel.success);
    assert_eq!(cancel.error.unwrap().code, CommandErrorCode::OrderNotOpen);

    // The table can seat the next party immediately
    let next = add_items(&state, &table_id, vec![item("Coffee", 4.0, 1)]);
    assert!(next.success);
    assert_ne!(next.order_id.unwrap(), order_id);
}

#[tokio::test]
async fn duplicate_commands_are_acknowledged_without_reexecution() {
    let state = test_state();
    let table_id = create_table(&state, 8);

    let cmd = command(OrderCommandPayload::AddItems {
        table_id: table_id.clone(),
        items: vec![item("Coffee", 4.0, 1)],
    });

    let first = state.orders.execute_command(cmd.clone());
    assert!(first.success);
    let order_id = first.order_id.unwrap();

    let replay = state.orders.execute_command(cmd);
    assert!(replay.success);
    assert_eq!(replay.order_id, None);

    // No second batch was added
    let snapshot = state.orders.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(state.tickets.list_for_order(&order_id).unwrap().len(), 1);
    assert_eq!(state.orders.order_events(&order_id).unwrap().len(), 2);
}

#[tokio::test]
async fn subscribers_receive_committed_events() {
    let state = test_state();
    let table_id = create_table(&state, 11);
    let mut feed = state.orders.subscribe();

    add_items(&state, &table_id, vec![item("Coffee", 4.0, 1)]);

    // One add on a free table commits two events
    let first = feed.recv().await.unwrap();
    let second = feed.recv().await.unwrap();
    assert_eq!(
        first.event_type,
        shared::order::OrderEventType::OrderOpened
    );
    assert_eq!(
        second.event_type,
        shared::order::OrderEventType::ItemsAdded
    );
    assert_eq!(first.order_id, second.order_id);
}

#[tokio::test]
async fn event_stream_rebuilds_the_snapshot() {
    let state = test_state();
    let table_id = create_table(&state, 1);
    let order_id = add_items(
        &state,
        &table_id,
        vec![item("Picanha", 20.0, 2), item("Farofa", 15.0, 1)],
    )
    .order_id
    .unwrap();
    assert!(state
        .orders
        .execute_command(command(OrderCommandPayload::Checkout {
            order_id: order_id.clone(),
            payment_method: PaymentMethod::Cash,
            waive_service_fee: false,
        }))
        .success);

    let events = state.orders.order_events(&order_id).unwrap();
    let replayed = comanda_server::orders::appliers::replay(&order_id, &events);
    let stored = state.orders.get_snapshot(&order_id).unwrap().unwrap();

    assert_eq!(replayed.status, stored.status);
    assert_eq!(replayed.items, stored.items);
    assert_eq!(replayed.subtotal, stored.subtotal);
    assert_eq!(replayed.service_fee, stored.service_fee);
    assert_eq!(replayed.total, stored.total);
}
