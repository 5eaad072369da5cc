//! HTTP API flow: signup, login, service, checkout, rating
//!
//! Exercises the full router with `tower::ServiceExt::oneshot`, the same
//! way a staff tablet and a customer phone would hit the server.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use comanda_server::auth::JwtConfig;
use comanda_server::db::Db;
use comanda_server::{build_router, Config, ServerState};

fn test_router() -> Router {
    let config = Config {
        work_dir: "./unused".to_string(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "test-secret-test-secret-test-secret".to_string(),
            expiration_minutes: 60,
            issuer: "comanda-server".to_string(),
        },
        environment: "test".to_string(),
        shutdown_timeout_ms: 1000,
        super_admin_token: Some("super-secret".to_string()),
    };
    let db = Db::open_in_memory().expect("in-memory db");
    let state = ServerState::with_db(&config, db).expect("state");
    build_router(state)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Signup a restaurant and log its admin in; returns (restaurant_id, token)
async fn signup_and_login(app: &Router) -> (String, String) {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/restaurants/signup",
            None,
            Some(json!({
                "name": "Cantina da Praça",
                "owner_email": "dona@cantina.example",
                "admin_name": "Marta",
                "admin_login_id": "marta",
                "admin_pin": "4821"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {}", body);
    let restaurant_id = body["restaurant"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({
                "restaurant_id": restaurant_id,
                "login_id": "marta",
                "pin": "4821"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    let token = body["token"].as_str().unwrap().to_string();
    (restaurant_id, token)
}

#[tokio::test]
async fn staff_routes_require_a_token() {
    let app = test_router();
    let (status, _) = send(&app, request("GET", "/api/tables", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn wrong_pin_gets_a_uniform_error() {
    let app = test_router();
    let (restaurant_id, _) = signup_and_login(&app).await;

    for (login_id, pin) in [("marta", "0000"), ("nobody", "4821")] {
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({
                    "restaurant_id": restaurant_id,
                    "login_id": login_id,
                    "pin": pin
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        // Same message whether the login id or the PIN was wrong
        assert_eq!(body["message"], "Invalid login or PIN");
    }
}

#[tokio::test]
async fn full_service_flow_over_http() {
    let app = test_router();
    let (_, token) = signup_and_login(&app).await;
    let token = Some(token.as_str());

    // Admin sets up a table
    let (status, table) = send(
        &app,
        request("POST", "/api/tables", token, Some(json!({"number": 12}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let table_id = table["id"].as_str().unwrap().to_string();

    // Waiter takes the order
    let (status, order) = send(
        &app,
        request(
            "POST",
            "/api/orders/items",
            token,
            Some(json!({
                "table_id": table_id,
                "items": [
                    {"item_id": "i-1", "name": "Picanha", "price": 20.0, "quantity": 2},
                    {"item_id": "i-2", "name": "Farofa", "price": 15.0, "quantity": 1}
                ]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add items failed: {}", order);
    let order_id = order["order_id"].as_str().unwrap().to_string();
    assert_eq!(order["subtotal"], 55.0);
    assert_eq!(order["service_fee"], 5.5);
    assert_eq!(order["total"], 60.5);
    assert_eq!(order["status"], "OPEN");

    // Kitchen works the ticket
    let (status, tickets) = send(&app, request("GET", "/api/kitchen-tickets", token, None)).await;
    assert_eq!(status, StatusCode::OK);
    let ticket_id = tickets[0]["id"].as_str().unwrap().to_string();
    for next in ["IN_PREP", "READY", "DELIVERED"] {
        let (status, ticket) = send(
            &app,
            request(
                "PUT",
                &format!("/api/kitchen-tickets/{}/status", ticket_id),
                token,
                Some(json!({"status": next})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ticket["status"], next);
    }

    // Backwards is rejected as an invalid state transition
    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/kitchen-tickets/{}/status", ticket_id),
            token,
            Some(json!({"status": "READY"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // The party previews an equal three-way split
    let (status, shares) = send(
        &app,
        request(
            "POST",
            &format!("/api/orders/{}/split/equal", order_id),
            token,
            Some(json!({"payers": 3})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shares.as_array().unwrap().len(), 3);
    let sum: f64 = shares
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["amount"].as_f64().unwrap())
        .sum();
    assert!((sum - 60.5).abs() < 0.001);

    // A manual split that does not balance reports its remainder
    let (status, split) = send(
        &app,
        request(
            "POST",
            &format!("/api/orders/{}/split/manual", order_id),
            token,
            Some(json!({"amounts": [30.0, 20.0]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(split["remainder"], 10.5);
    assert_eq!(split["balanced"], false);

    // Checkout with the fee
    let (status, paid) = send(
        &app,
        request(
            "POST",
            &format!("/api/orders/{}/checkout", order_id),
            token,
            Some(json!({"payment_method": "CASH"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["status"], "PAID");
    assert_eq!(paid["total"], 60.5);

    // The customer rates the visit; a second rating is rejected
    let rating = json!({"order_id": order_id, "stars": 5, "comment": "ótimo!"});
    let (status, _) = send(
        &app,
        request("POST", "/api/customer/ratings", None, Some(rating.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        request("POST", "/api/customer/ratings", None, Some(rating)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Table is free again
    let (status, fetched) = send(
        &app,
        request("GET", &format!("/api/tables/{}", table_id), token, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "FREE");
}

#[tokio::test]
async fn customer_self_service_flow() {
    let app = test_router();
    let (restaurant_id, token) = signup_and_login(&app).await;

    let (_, table) = send(
        &app,
        request(
            "POST",
            "/api/tables",
            Some(token.as_str()),
            Some(json!({"number": 4})),
        ),
    )
    .await;
    let table_id = table["id"].as_str().unwrap().to_string();

    // Customer orders from the QR-code menu, no token
    let (status, order) = send(
        &app,
        request(
            "POST",
            &format!("/api/customer/tables/{}/items", table_id),
            None,
            Some(json!({
                "customer_name": "João",
                "items": [{"item_id": "i-9", "name": "Caipirinha", "price": 9.0, "quantity": 2}]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "customer order failed: {}", order);
    assert_eq!(order["waiter_id"], "CUSTOMER");
    assert_eq!(order["waiter_name"], "João");
    assert_eq!(order["subtotal"], 18.0);
    let order_id = order["order_id"].as_str().unwrap().to_string();

    // The customer can watch the open order on their table
    let (status, current) = send(
        &app,
        request(
            "GET",
            &format!("/api/customer/tables/{}/order", table_id),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["order_id"], order_id.as_str());

    // Calling a waiter creates a pending call the staff can see and attend
    let (status, call) = send(
        &app,
        request(
            "POST",
            "/api/customer/calls",
            None,
            Some(json!({"restaurant_id": restaurant_id, "table_number": 4})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(call["status"], "PENDING");
    let call_id = call["id"].as_str().unwrap().to_string();

    let (status, attended) = send(
        &app,
        request(
            "POST",
            &format!("/api/calls/{}/attend", call_id),
            Some(token.as_str()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attended["status"], "ATTENDED");

    // Rating before payment is rejected
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/customer/ratings",
            None,
            Some(json!({"order_id": order_id, "stars": 4})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
