mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{eventually, spawn_app};
use serde_json::{Value, json};

async fn create_product(server: &TestServer, name: &str, price: f64, stock: i64) -> i64 {
    let response = server
        .post("/shop/products")
        .json(&json!({
            "name": name,
            "price": price,
            "stock": stock,
            "category": "gadgets",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

async fn place_order(server: &TestServer, items: Value) -> axum_test::TestResponse {
    server
        .post("/shop/orders")
        .json(&json!({
            "customer_name": "Ann",
            "customer_email": "ann@example.com",
            "items": items,
        }))
        .await
}

#[tokio::test]
async fn test_create_and_get_product() {
    let app = spawn_app().await;
    let id = create_product(&app.server, "Widget", 9.5, 4).await;

    let product = app
        .server
        .get(&format!("/shop/products/{id}"))
        .await
        .json::<Value>();

    assert_eq!(product["name"], "Widget");
    assert_eq!(product["stock"], 4);
    assert_eq!(product["category"], "gadgets");
}

#[tokio::test]
async fn test_product_price_must_be_positive() {
    let app = spawn_app().await;

    app.server
        .post("/shop/products")
        .json(&json!({ "name": "Free", "price": 0.0, "stock": 1 }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_product_message() {
    let app = spawn_app().await;

    let response = app.server.get("/shop/products/42").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Product with ID 42 not found"
    );
}

#[tokio::test]
async fn test_product_filters() {
    let app = spawn_app().await;
    create_product(&app.server, "Cheap", 2.0, 0).await;
    create_product(&app.server, "Mid", 20.0, 5).await;
    create_product(&app.server, "Dear", 200.0, 1).await;

    let in_stock = app
        .server
        .get("/shop/products")
        .add_query_param("in_stock", true)
        .await
        .json::<Vec<Value>>();
    assert_eq!(in_stock.len(), 2);

    let priced = app
        .server
        .get("/shop/products")
        .add_query_param("min_price", 10)
        .add_query_param("max_price", 100)
        .await
        .json::<Vec<Value>>();
    assert_eq!(priced.len(), 1);
    assert_eq!(priced[0]["name"], "Mid");

    let other = app
        .server
        .get("/shop/products")
        .add_query_param("category", "books")
        .await
        .json::<Vec<Value>>();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_partial_product_update_and_delete() {
    let app = spawn_app().await;
    let id = create_product(&app.server, "Widget", 9.5, 4).await;

    let updated = app
        .server
        .put(&format!("/shop/products/{id}"))
        .json(&json!({ "price": 12.0 }))
        .await
        .json::<Value>();
    assert_eq!(updated["price"], 12.0);
    assert_eq!(updated["name"], "Widget");

    app.server
        .delete(&format!("/shop/products/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .delete(&format!("/shop/products/{id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_order_reserves_stock_and_totals_lines() {
    let app = spawn_app().await;
    let widget = create_product(&app.server, "Widget", 10.0, 5).await;
    let gadget = create_product(&app.server, "Gadget", 2.5, 10).await;

    let response = place_order(
        &app.server,
        json!([
            { "product_id": widget, "quantity": 2 },
            { "product_id": gadget, "quantity": 4 },
        ]),
    )
    .await;

    response.assert_status(StatusCode::CREATED);
    let order = response.json::<Value>();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], 30.0);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["product_name"], "Widget");
    assert_eq!(order["items"][0]["subtotal"], 20.0);

    let widget = app
        .server
        .get(&format!("/shop/products/{widget}"))
        .await
        .json::<Value>();
    assert_eq!(widget["stock"], 3);
}

#[tokio::test]
async fn test_order_queues_confirmation() {
    let app = spawn_app().await;
    let widget = create_product(&app.server, "Widget", 10.0, 5).await;

    let order = place_order(&app.server, json!([{ "product_id": widget, "quantity": 1 }]))
        .await
        .json::<Value>();
    let order_id = order["id"].as_i64().unwrap();

    let log = app.state.task_log.clone();
    eventually(|| {
        let log = log.clone();
        async move { log.len().await == 1 }
    })
    .await;

    let entries = app.state.task_log.recent(1).await;
    assert_eq!(
        entries[0].message,
        format!("Order confirmation for order #{order_id} sent to ann@example.com (total 10.00)")
    );
}

#[tokio::test]
async fn test_insufficient_stock_rolls_back() {
    let app = spawn_app().await;
    let widget = create_product(&app.server, "Widget", 10.0, 5).await;
    let gadget = create_product(&app.server, "Gadget", 2.5, 1).await;

    let response = place_order(
        &app.server,
        json!([
            { "product_id": widget, "quantity": 2 },
            { "product_id": gadget, "quantity": 3 },
        ]),
    )
    .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Insufficient stock for Gadget. Available: 1, Requested: 3"
    );

    let widget = app
        .server
        .get(&format!("/shop/products/{widget}"))
        .await
        .json::<Value>();
    assert_eq!(widget["stock"], 5);

    let orders = app.server.get("/shop/orders").await.json::<Vec<Value>>();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_order_for_missing_product() {
    let app = spawn_app().await;

    place_order(&app.server, json!([{ "product_id": 77, "quantity": 1 }]))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_order_requires_items() {
    let app = spawn_app().await;

    place_order(&app.server, json!([]))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_orders_omits_lines_and_filters_status() {
    let app = spawn_app().await;
    let widget = create_product(&app.server, "Widget", 10.0, 5).await;
    place_order(&app.server, json!([{ "product_id": widget, "quantity": 1 }])).await;
    let second = place_order(&app.server, json!([{ "product_id": widget, "quantity": 1 }]))
        .await
        .json::<Value>();

    app.server
        .patch(&format!("/shop/orders/{}/status", second["id"]))
        .json(&json!({ "status": "confirmed" }))
        .await
        .assert_status_ok();

    let all = app.server.get("/shop/orders").await.json::<Vec<Value>>();
    assert_eq!(all.len(), 2);
    assert!(all[0].get("items").is_none());

    let confirmed = app
        .server
        .get("/shop/orders")
        .add_query_param("status", "confirmed")
        .await
        .json::<Vec<Value>>();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0]["id"], second["id"]);
}

#[tokio::test]
async fn test_get_order_includes_lines() {
    let app = spawn_app().await;
    let widget = create_product(&app.server, "Widget", 10.0, 5).await;
    let order = place_order(&app.server, json!([{ "product_id": widget, "quantity": 2 }]))
        .await
        .json::<Value>();

    let fetched = app
        .server
        .get(&format!("/shop/orders/{}", order["id"]))
        .await
        .json::<Value>();

    assert_eq!(fetched["items"][0]["quantity"], 2);
    assert_eq!(fetched["items"][0]["price_at_purchase"], 10.0);

    app.server.get("/shop/orders/999").await.assert_status_not_found();
}

#[tokio::test]
async fn test_cancel_restores_stock() {
    let app = spawn_app().await;
    let widget = create_product(&app.server, "Widget", 10.0, 5).await;
    let order = place_order(&app.server, json!([{ "product_id": widget, "quantity": 3 }]))
        .await
        .json::<Value>();

    app.server
        .delete(&format!("/shop/orders/{}", order["id"]))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let product = app
        .server
        .get(&format!("/shop/products/{widget}"))
        .await
        .json::<Value>();
    assert_eq!(product["stock"], 5);

    let cancelled = app
        .server
        .get(&format!("/shop/orders/{}", order["id"]))
        .await
        .json::<Value>();
    assert_eq!(cancelled["status"], "cancelled");
}

#[tokio::test]
async fn test_cancel_through_status_restores_stock() {
    let app = spawn_app().await;
    let widget = create_product(&app.server, "Widget", 10.0, 5).await;
    let order = place_order(&app.server, json!([{ "product_id": widget, "quantity": 3 }]))
        .await
        .json::<Value>();

    let cancelled = app
        .server
        .patch(&format!("/shop/orders/{}/status", order["id"]))
        .json(&json!({ "status": "cancelled" }))
        .await;
    cancelled.assert_status_ok();
    assert_eq!(cancelled.json::<Value>()["status"], "cancelled");

    let product = app
        .server
        .get(&format!("/shop/products/{widget}"))
        .await
        .json::<Value>();
    assert_eq!(product["stock"], 5);

    app.server
        .delete(&format!("/shop/orders/{}", order["id"]))
        .await
        .assert_status_bad_request();
    let product = app
        .server
        .get(&format!("/shop/products/{widget}"))
        .await
        .json::<Value>();
    assert_eq!(product["stock"], 5);
}

#[tokio::test]
async fn test_shipped_order_cannot_be_cancelled() {
    let app = spawn_app().await;
    let widget = create_product(&app.server, "Widget", 10.0, 5).await;
    let order = place_order(&app.server, json!([{ "product_id": widget, "quantity": 1 }]))
        .await
        .json::<Value>();

    app.server
        .patch(&format!("/shop/orders/{}/status", order["id"]))
        .json(&json!({ "status": "shipped" }))
        .await
        .assert_status_ok();

    app.server
        .delete(&format!("/shop/orders/{}", order["id"]))
        .await
        .assert_status_bad_request();

    let response = app
        .server
        .patch(&format!("/shop/orders/{}/status", order["id"]))
        .json(&json!({ "status": "cancelled" }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Cannot cancel order with status shipped"
    );
}

#[tokio::test]
async fn test_status_transitions() {
    let app = spawn_app().await;
    let widget = create_product(&app.server, "Widget", 10.0, 5).await;
    let order = place_order(&app.server, json!([{ "product_id": widget, "quantity": 1 }]))
        .await
        .json::<Value>();
    let path = format!("/shop/orders/{}/status", order["id"]);

    let delivered = app
        .server
        .patch(&path)
        .json(&json!({ "status": "delivered" }))
        .await
        .json::<Value>();
    assert_eq!(delivered["status"], "delivered");

    let response = app
        .server
        .patch(&path)
        .json(&json!({ "status": "pending" }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Cannot change order status from delivered to pending"
    );

    app.server
        .patch(&path)
        .json(&json!({ "status": "lost" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
