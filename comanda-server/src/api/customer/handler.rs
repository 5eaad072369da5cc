//! Public customer handlers
//!
//! Self-service orders run through the same command pipeline as staff
//! orders, with the sentinel waiter id marking them customer-placed.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{
    MenuCategoryRepository, MenuItemRepository, RatingRepository, RestaurantRepository,
};
use crate::utils::{AppError, AppResult};
use shared::models::{MenuCategory, MenuItem, Rating, RatingCreate, WaiterCall};
use shared::order::{
    CommandError, CommandErrorCode, LineItemInput, OrderCommand, OrderCommandPayload,
    OrderSnapshot, CUSTOMER_WAITER_ID,
};

/// Display name used until the customer tells us theirs
const DEFAULT_CUSTOMER_NAME: &str = "Cliente";

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub restaurant_id: String,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub categories: Vec<MenuCategory>,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerAddItemsRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    pub items: Vec<LineItemInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNameRequest {
    pub customer_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CallWaiterRequest {
    pub restaurant_id: String,
    pub table_number: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRatingRequest {
    pub order_id: String,
    #[validate(range(min = 1, max = 5))]
    pub stars: u8,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

fn require_unblocked(state: &ServerState, restaurant_id: &str) -> AppResult<()> {
    let restaurant = RestaurantRepository::new(state.db.clone())
        .find_by_id(restaurant_id)?
        .ok_or_else(|| AppError::not_found("Restaurant not found"))?;
    if restaurant.is_blocked {
        return Err(AppError::forbidden("Restaurant is not accepting orders"));
    }
    Ok(())
}

fn run_customer_command(
    state: &ServerState,
    restaurant_id: &str,
    customer_name: &str,
    payload: OrderCommandPayload,
) -> AppResult<shared::order::CommandResponse> {
    let cmd = OrderCommand {
        command_id: uuid::Uuid::new_v4().to_string(),
        restaurant_id: restaurant_id.to_string(),
        operator_id: CUSTOMER_WAITER_ID.to_string(),
        operator_name: customer_name.to_string(),
        timestamp: crate::utils::now_millis(),
        payload,
    };
    let response = state.orders.execute_command(cmd);
    if !response.success {
        let error = response.error.unwrap_or_else(|| {
            CommandError::new(CommandErrorCode::InternalError, "command failed")
        });
        return Err(error.into());
    }
    Ok(response)
}

/// GET /api/customer/menu - active categories and items
pub async fn menu(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<MenuResponse>> {
    require_unblocked(&state, &query.restaurant_id)?;
    let categories = MenuCategoryRepository::new(state.db.clone())
        .find_by_restaurant(&query.restaurant_id)?
        .into_iter()
        .filter(|c| c.is_active)
        .collect();
    let items = MenuItemRepository::new(state.db.clone()).find_active(&query.restaurant_id)?;
    Ok(Json(MenuResponse { categories, items }))
}

/// GET /api/customer/tables/:table_id/order - the table's open order, for
/// the customer to watch totals and status
pub async fn current_order(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<Option<OrderSnapshot>>> {
    let order_id = state
        .orders
        .active_order_for_table(&table_id)
        .map_err(|e| AppError::database(e.to_string()))?;
    let snapshot = match order_id {
        Some(id) => state
            .orders
            .get_snapshot(&id)
            .map_err(|e| AppError::database(e.to_string()))?,
        None => None,
    };
    Ok(Json(snapshot))
}

/// POST /api/customer/tables/:table_id/items - self-service order
pub async fn add_items(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
    Json(req): Json<CustomerAddItemsRequest>,
) -> AppResult<Json<OrderSnapshot>> {
    let table = state.tables.get(&table_id)?;
    require_unblocked(&state, &table.restaurant_id)?;

    let customer_name = req
        .customer_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_CUSTOMER_NAME);

    let response = run_customer_command(
        &state,
        &table.restaurant_id,
        customer_name,
        OrderCommandPayload::AddItems {
            table_id,
            items: req.items,
        },
    )?;
    let order_id = response
        .order_id
        .ok_or_else(|| AppError::internal("command response missing order id"))?;
    let snapshot = state
        .orders
        .get_snapshot(&order_id)
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::internal("order vanished after command"))?;
    Ok(Json(snapshot))
}

/// POST /api/customer/orders/:id/name - rename the customer on a
/// self-service order
pub async fn update_name(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateNameRequest>,
) -> AppResult<Json<OrderSnapshot>> {
    let snapshot = state
        .orders
        .get_snapshot(&id)
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    if snapshot.waiter_id != CUSTOMER_WAITER_ID {
        return Err(AppError::invalid_state(
            "Only self-service orders can be renamed",
        ));
    }

    let trimmed_name = req.customer_name.trim().to_string();
    run_customer_command(
        &state,
        &snapshot.restaurant_id,
        &trimmed_name,
        OrderCommandPayload::UpdateCustomerName {
            order_id: id.clone(),
            customer_name: req.customer_name,
        },
    )?;

    let snapshot = state
        .orders
        .get_snapshot(&id)
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::internal("order vanished after command"))?;
    Ok(Json(snapshot))
}

/// POST /api/customer/calls - table calls a waiter
pub async fn call_waiter(
    State(state): State<ServerState>,
    Json(req): Json<CallWaiterRequest>,
) -> AppResult<Json<WaiterCall>> {
    require_unblocked(&state, &req.restaurant_id)?;
    Ok(Json(state.calls.call(&req.restaurant_id, req.table_number)?))
}

/// POST /api/customer/ratings - one rating per paid order
pub async fn submit_rating(
    State(state): State<ServerState>,
    Json(req): Json<SubmitRatingRequest>,
) -> AppResult<Json<Rating>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let snapshot = state
        .orders
        .get_snapshot(&req.order_id)
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", req.order_id)))?;
    if !snapshot.is_paid() {
        return Err(AppError::invalid_state(
            "Only paid orders can be rated",
        ));
    }

    let repo = RatingRepository::new(state.db.clone());
    if repo.find_by_order(&req.order_id)?.is_some() {
        return Err(AppError::conflict("Order has already been rated"));
    }

    let payload = RatingCreate {
        order_id: req.order_id,
        stars: req.stars,
        customer_name: req.customer_name,
        comment: req.comment,
    };
    let rating = Rating {
        id: uuid::Uuid::new_v4().to_string(),
        restaurant_id: snapshot.restaurant_id.clone(),
        order_id: payload.order_id,
        table_number: snapshot.table_number,
        waiter_id: Some(snapshot.waiter_id.clone()),
        waiter_name: Some(snapshot.waiter_name.clone()),
        stars: payload.stars,
        customer_name: payload.customer_name,
        comment: payload.comment,
        created_at: crate::utils::now_millis(),
    };
    repo.create(&rating)?;
    tracing::info!(order_id = %rating.order_id, stars = rating.stars, "Rating submitted");
    Ok(Json(rating))
}
