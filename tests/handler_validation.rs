mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::{Value, json};

fn user() -> Value {
    json!({
        "username": "john_doe",
        "email": "john@example.com",
        "age": 30,
        "phone": "+14155552671",
    })
}

fn product() -> Value {
    json!({
        "name": "Desk Lamp",
        "price": 49.99,
        "quantity": 10,
        "discount": 15.0,
        "sku": "LMP-0001",
    })
}

fn review(comment: &str) -> Value {
    json!({ "rating": 4, "comment": comment, "reviewer_name": "Jane" })
}

fn field_errors(response: &axum_test::TestResponse) -> Value {
    response.json::<Value>()["error"]["details"].clone()
}

// ─── Query parameters ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_defaults() {
    let app = spawn_app().await;

    let response = app.server.get("/validation/search?q=rust%20book").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["query"], "rust book");
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    assert!(body["sort_by"].is_null());
}

#[tokio::test]
async fn test_search_requires_q() {
    let app = spawn_app().await;

    app.server
        .get("/validation/search")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_search_rejects_bad_values() {
    let app = spawn_app().await;

    for query in [
        "q=rust!",
        "q=rust&page=0",
        "q=rust&limit=101",
        "q=rust&sort_by=popularity",
        "q=rust&min_price=-1",
    ] {
        app.server
            .get(&format!("/validation/search?{query}"))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_filter_collects_repeated_tags() {
    let app = spawn_app().await;

    let response = app
        .server
        .get("/validation/filter?category=books&tags=new&tags=sale&in_stock=false")
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["category"], "books");
    assert_eq!(body["in_stock"], false);
    assert_eq!(body["tags"], json!(["new", "sale"]));
}

#[tokio::test]
async fn test_filter_requires_letters_only_category() {
    let app = spawn_app().await;

    let missing = app.server.get("/validation/filter?tags=a").await;
    missing.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(field_errors(&missing).get("query").is_some());

    let digits = app.server.get("/validation/filter?category=b00ks").await;
    digits.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(field_errors(&digits).get("category").is_some());
}

#[tokio::test]
async fn test_regex_examples() {
    let app = spawn_app().await;

    let response = app
        .server
        .get("/validation/advanced/regex-examples?ip_address=192.168.1.1&hex_color=%23FF5733&url_slug=hello-world")
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["hex_color"], "#FF5733");
    assert_eq!(body["credit_card"], "Not provided");

    app.server
        .get("/validation/advanced/regex-examples?url_slug=Hello_World")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ─── Path parameters ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_user_id_range() {
    let app = spawn_app().await;

    app.server.get("/validation/users/42").await.assert_status_ok();
    app.server
        .get("/validation/users/0")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    app.server
        .get("/validation/users/1000000")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    app.server
        .get("/validation/users/abc")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_product_sku_pattern() {
    let app = spawn_app().await;

    let ok = app.server.get("/validation/products/ABC-1234").await;
    ok.assert_status_ok();
    assert_eq!(ok.json::<Value>()["sku"], "ABC-1234");

    app.server
        .get("/validation/products/abc-1234")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_order_path() {
    let app = spawn_app().await;

    app.server
        .get("/validation/orders/2024/6/ORD-AB12CD34")
        .await
        .assert_status_ok();

    for path in [
        "/validation/orders/2019/6/ORD-AB12CD34",
        "/validation/orders/2024/13/ORD-AB12CD34",
        "/validation/orders/2024/6/ORD-123",
    ] {
        app.server
            .get(path)
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

// ─── Bodies ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_user() {
    let app = spawn_app().await;

    let response = app.server.post("/validation/users").json(&user()).await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["user"]["username"], "john_doe");
}

#[tokio::test]
async fn test_create_user_reports_each_bad_field() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/validation/users")
        .json(&json!({
            "username": "jd",
            "email": "not-an-email",
            "age": 15,
            "phone": "0123",
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let details = field_errors(&response);
    for field in ["username", "email", "age", "phone"] {
        assert!(details.get(field).is_some(), "missing error for {field}");
    }
}

#[tokio::test]
async fn test_create_product_price_bounds() {
    let app = spawn_app().await;

    app.server
        .post("/validation/products")
        .json(&product())
        .await
        .assert_status(StatusCode::CREATED);

    let mut free = product();
    free["price"] = json!(0);
    app.server
        .post("/validation/products")
        .json(&free)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_review_spam_words() {
    let app = spawn_app().await;

    app.server
        .post("/validation/reviews")
        .json(&review("Solid build and works as described"))
        .await
        .assert_status(StatusCode::CREATED);

    let spam = app
        .server
        .post("/validation/reviews")
        .json(&review("Visit my CASINO for great deals"))
        .await;
    spam.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(field_errors(&spam).get("comment").is_some());
}

#[tokio::test]
async fn test_update_user_with_query_flag() {
    let app = spawn_app().await;

    let response = app
        .server
        .put("/validation/users/7?send_email=true")
        .json(&user())
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["message"], "User 7 updated successfully");
    assert_eq!(body["send_email"], true);
}

#[tokio::test]
async fn test_add_product_review() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/validation/products/3/reviews?verified_purchase=true")
        .json(&review("Arrived quickly, good value"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "Review added to product 3");
    assert_eq!(body["verified_purchase"], true);
}

#[tokio::test]
async fn test_complex_item_validates_nested_models() {
    let app = spawn_app().await;

    app.server
        .post("/validation/items/complex")
        .json(&json!({ "product": product(), "user": user(), "quantity": 2 }))
        .await
        .assert_status(StatusCode::CREATED);

    let mut bad_product = product();
    bad_product["sku"] = json!("nope");
    let response = app
        .server
        .post("/validation/items/complex")
        .json(&json!({ "product": bad_product, "user": user(), "quantity": 2 }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(field_errors(&response).get("product").is_some());
}

#[tokio::test]
async fn test_place_order_priority_and_discount() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/validation/orders/place")
        .json(&json!({
            "product_id": 1,
            "quantity": 3,
            "priority": "urgent",
            "discount_code": "SAVE2024",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["priority"], "urgent");

    app.server
        .post("/validation/orders/place")
        .json(&json!({ "product_id": 1, "quantity": 3, "priority": "asap" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    app.server
        .post("/validation/orders/place")
        .json(&json!({
            "product_id": 1,
            "quantity": 3,
            "priority": "low",
            "discount_code": "save",
        }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_nested_validation_defaults_metadata() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/validation/advanced/nested-validation")
        .json(&json!({ "name": "Widget", "price": 9.5 }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["metadata"], json!({}));
}
