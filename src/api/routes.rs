//! API route configuration, one router per lesson module.
//!
//! Each function returns a router nested under its prefix by
//! [`crate::routes::build_router`].

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use crate::api::handlers::{
    auth, background, books, demo, inventory, members, ml, shop, todos, validation,
};
use crate::api::middleware::auth as bearer;
use crate::state::AppState;

/// `/todos`
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(todos::list_todos_handler)
                .post(todos::create_todo_handler)
                .delete(todos::clear_todos_handler),
        )
        .route(
            "/{id}",
            get(todos::get_todo_handler)
                .put(todos::update_todo_handler)
                .delete(todos::delete_todo_handler),
        )
}

/// `/validation`
pub fn validation_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(validation::search_handler))
        .route("/filter", get(validation::filter_handler))
        .route("/users", post(validation::create_user_handler))
        .route(
            "/users/{user_id}",
            get(validation::get_user_handler).put(validation::update_user_handler),
        )
        .route("/products", post(validation::create_product_handler))
        .route(
            "/products/{product_id}",
            get(validation::get_product_handler),
        )
        .route(
            "/products/{product_id}/reviews",
            post(validation::add_product_review_handler),
        )
        .route("/reviews", post(validation::create_review_handler))
        .route(
            "/orders/{year}/{month}/{order_id}",
            get(validation::get_order_handler),
        )
        .route("/orders/place", post(validation::place_order_handler))
        .route(
            "/items/complex",
            post(validation::create_complex_item_handler),
        )
        .route(
            "/advanced/regex-examples",
            get(validation::regex_examples_handler),
        )
        .route(
            "/advanced/nested-validation",
            post(validation::nested_validation_handler),
        )
}

/// `/di`; authentication and rate limits are extractor arguments.
pub fn di_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(members::list_members_handler).post(members::create_member_handler),
        )
        .route(
            "/users/{id}",
            get(members::get_member_handler)
                .put(members::update_member_handler)
                .delete(members::delete_member_handler),
        )
        .route(
            "/rate-limit-status",
            get(members::rate_limit_status_handler),
        )
        .route("/stats", get(members::member_stats_handler))
        .route(
            "/learn/simple-dependency",
            get(members::simple_dependency_handler),
        )
        .route(
            "/learn/multiple-dependencies",
            get(members::multiple_dependencies_handler),
        )
        .route(
            "/learn/chained-dependencies",
            get(members::chained_dependencies_handler),
        )
}

/// `/books`
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(books::list_books_handler).post(books::create_book_handler),
        )
        .route("/stats/summary", get(books::book_stats_handler))
        .route("/cache/stats", get(books::cache_stats_handler))
        .route("/cache", axum::routing::delete(books::clear_cache_handler))
        .route(
            "/{id}",
            get(books::get_book_handler)
                .put(books::update_book_handler)
                .delete(books::delete_book_handler),
        )
}

/// `/auth`
///
/// # Public
///
/// - `POST /register`, `POST /token`, `POST /refresh`, `GET /status`
///
/// # Bearer token required
///
/// - `POST /logout`
/// - `GET  /users/me`, `GET /users/me/items`, `POST /items`
/// - `GET  /users`, `GET /users/{username}`, `PUT /users/{username}/role`,
///   `DELETE /users/{username}`
/// - `GET  /manager/dashboard`
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(auth::logout_handler))
        .route("/users/me", get(auth::me_handler))
        .route("/users/me/items", get(auth::my_items_handler))
        .route("/items", post(auth::create_item_handler))
        .route("/users", get(auth::list_accounts_handler))
        .route(
            "/users/{username}",
            get(auth::get_account_handler).delete(auth::delete_account_handler),
        )
        .route("/users/{username}/role", put(auth::update_role_handler))
        .route("/manager/dashboard", get(auth::manager_dashboard_handler))
        .route_layer(middleware::from_fn_with_state(state, bearer::layer));

    Router::new()
        .route("/register", post(auth::register_handler))
        .route("/token", post(auth::token_handler))
        .route("/refresh", post(auth::refresh_handler))
        .route("/status", get(auth::auth_status_handler))
        .merge(protected)
}

/// `/background`
pub fn background_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            post(background::send_notification_handler),
        )
        .route("/orders", post(background::process_order_handler))
        .route(
            "/logs",
            get(background::task_logs_handler).delete(background::clear_task_logs_handler),
        )
}

/// `/middleware`
pub fn middleware_routes() -> Router<AppState> {
    Router::new()
        .route("/fast", get(demo::fast_handler))
        .route("/slow", get(demo::slow_handler))
        .route("/echo", post(demo::echo_handler))
        .route("/large", get(demo::large_handler))
        .route("/headers", get(demo::headers_handler))
}

/// `/errors`
pub fn error_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(inventory::list_items_handler).post(inventory::create_item_handler),
        )
        .route(
            "/items/{id}",
            get(inventory::get_item_handler).delete(inventory::delete_item_handler),
        )
        .route("/orders", post(inventory::place_stock_order_handler))
        .route("/test-error", get(inventory::test_error_handler))
        .route(
            "/test-value-error",
            get(inventory::test_value_error_handler),
        )
}

/// `/shop`
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(shop::list_products_handler).post(shop::create_product_handler),
        )
        .route(
            "/products/{id}",
            get(shop::get_product_handler)
                .put(shop::update_product_handler)
                .delete(shop::delete_product_handler),
        )
        .route(
            "/orders",
            get(shop::list_orders_handler).post(shop::create_order_handler),
        )
        .route(
            "/orders/{id}",
            get(shop::get_order_handler).delete(shop::cancel_order_handler),
        )
        .route(
            "/orders/{id}/status",
            patch(shop::update_order_status_handler),
        )
}

/// `/ml`
pub fn ml_routes() -> Router<AppState> {
    Router::new()
        .route("/models", get(ml::list_models_handler))
        .route("/predict", post(ml::predict_handler))
        .route("/predict/batch", post(ml::predict_batch_handler))
        .route("/predictions/history", get(ml::history_handler))
        .route("/predictions/stats", get(ml::prediction_stats_handler))
}
