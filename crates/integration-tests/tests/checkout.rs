//! Placing an order from the cart.

use axum::http::{Method, StatusCode};
use bookshelf_client::storage::{MemoryStore, keys};
use bookshelf_client::views::{CartCommand, Command, Page};
use bookshelf_client::{Notice, Severity, Storefront};
use bookshelf_integration_tests::{TestBackend, fixtures};
use serde_json::json;

const CART: &str = r#"[{"book_id": 3, "quantity": 2}, {"book_id": 5, "quantity": 1}]"#;

async fn logged_in_backend() -> TestBackend {
    let backend = TestBackend::start().await.expect("backend");
    backend.reply(
        Method::GET,
        "/users/",
        StatusCode::OK,
        &fixtures::page(vec![fixtures::user(2, "anna")]),
    );
    backend.reply(
        Method::GET,
        "/books/3/",
        StatusCode::OK,
        &fixtures::book(3, "War and Peace", "300.00", 4),
    );
    backend.reply(
        Method::GET,
        "/books/5/",
        StatusCode::OK,
        &fixtures::book(5, "Resurrection", "150.00", 1),
    );
    backend
}

async fn storefront(backend: &TestBackend, store: &MemoryStore) -> Storefront<MemoryStore> {
    Storefront::start(backend.config(), store.clone())
        .await
        .expect("storefront")
}

fn checkout() -> Command {
    Command::Cart(CartCommand::Checkout)
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn test_checkout_posts_cart_and_shows_orders() {
    let backend = logged_in_backend().await;
    let order = fixtures::order(12, fixtures::book(3, "War and Peace", "300.00", 4), 2, "600.00");
    backend.reply(Method::POST, "/create-order/", StatusCode::CREATED, &order);
    backend.reply(Method::GET, "/orders/", StatusCode::OK, &fixtures::page(vec![order]));

    let store = MemoryStore::with_values([(keys::TOKEN, "tok"), (keys::CART, CART)]);
    let mut storefront = storefront(&backend, &store).await;

    let outcome = storefront.dispatch(checkout()).await;

    assert_eq!(
        outcome.notices.first(),
        Some(&Notice::success("Order placed successfully"))
    );
    let screen = outcome.screen.expect("orders page");
    assert!(screen.starts_with("Orders"));
    assert!(screen.contains("Order #12 | Pending"));
    assert!(screen.contains("War and Peace x 2 = 600.00 ₽"));

    let posted = backend.requests_to(&Method::POST, "/create-order/");
    assert_eq!(posted.len(), 1);
    let request = posted.first().expect("request");
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(
        request.body,
        Some(json!({"items": [
            {"book_id": 3, "quantity": 2},
            {"book_id": 5, "quantity": 1}
        ]}))
    );

    assert!(storefront.cart().is_empty());
    assert_eq!(store.get(keys::CART).as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_unreadable_success_body_still_clears_cart() {
    let backend = logged_in_backend().await;
    backend.reply_raw(Method::POST, "/create-order/", StatusCode::CREATED, "created");
    backend.reply(Method::GET, "/orders/", StatusCode::OK, &fixtures::page(vec![]));

    let store = MemoryStore::with_values([(keys::TOKEN, "tok"), (keys::CART, CART)]);
    let mut storefront = storefront(&backend, &store).await;

    let outcome = storefront.dispatch(checkout()).await;

    assert!(outcome.notices.iter().all(|notice| !notice.is_error()));
    assert!(storefront.cart().is_empty());
    assert_eq!(store.get(keys::CART).as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_failed_clear_after_order_is_reported() {
    let backend = logged_in_backend().await;
    let order = fixtures::order(13, fixtures::book(5, "Resurrection", "150.00", 1), 1, "150.00");
    backend.reply(Method::POST, "/create-order/", StatusCode::CREATED, &order);
    backend.reply(Method::GET, "/orders/", StatusCode::OK, &fixtures::page(vec![order]));

    let store = MemoryStore::with_values([(keys::TOKEN, "tok"), (keys::CART, CART)]);
    let mut storefront = storefront(&backend, &store).await;
    store.set_fail_writes(true);

    let outcome = storefront.dispatch(checkout()).await;

    assert_eq!(
        outcome.notices,
        vec![
            Notice::success("Order placed successfully"),
            Notice::error("Could not save local data"),
        ]
    );
    // The order exists, so the in-memory cart is empty regardless
    assert!(storefront.cart().is_empty());
    assert_eq!(store.get(keys::CART).as_deref(), Some(CART));
}

// =============================================================================
// Refusals
// =============================================================================

#[tokio::test]
async fn test_backend_refusal_keeps_cart() {
    let backend = logged_in_backend().await;
    backend.reply(
        Method::POST,
        "/create-order/",
        StatusCode::BAD_REQUEST,
        &json!({"error": "Not enough stock for Resurrection"}),
    );

    let store = MemoryStore::with_values([(keys::TOKEN, "tok"), (keys::CART, CART)]);
    let mut storefront = storefront(&backend, &store).await;

    let outcome = storefront.dispatch(checkout()).await;

    assert_eq!(
        outcome.notices,
        vec![Notice::error("Order failed: Not enough stock for Resurrection")]
    );
    assert_eq!(outcome.next, None::<Page>);
    assert_eq!(storefront.cart().total_count(), 3);
    assert_eq!(store.get(keys::CART).as_deref(), Some(CART));
    assert!(backend.requests_to(&Method::GET, "/orders/").is_empty());
}

#[tokio::test]
async fn test_refusal_without_reason_uses_fallback() {
    let backend = logged_in_backend().await;
    backend.reply_raw(Method::POST, "/create-order/", StatusCode::INTERNAL_SERVER_ERROR, "");

    let store = MemoryStore::with_values([(keys::TOKEN, "tok"), (keys::CART, CART)]);
    let mut storefront = storefront(&backend, &store).await;

    let outcome = storefront.dispatch(checkout()).await;

    assert_eq!(outcome.notices, vec![Notice::error("Could not place the order")]);
    assert_eq!(storefront.cart().len(), 2);
}

#[tokio::test]
async fn test_logged_out_checkout_sends_nothing() {
    let backend = logged_in_backend().await;
    let store = MemoryStore::with_values([(keys::CART, CART)]);
    let mut storefront = storefront(&backend, &store).await;

    let outcome = storefront.dispatch(checkout()).await;

    let notice = outcome.notices.first().expect("notice");
    assert_eq!(notice.severity, Severity::Warning);
    assert_eq!(notice.message, "Please log in to place an order");
    assert!(backend.requests().is_empty());
    assert_eq!(storefront.cart().len(), 2);
}
