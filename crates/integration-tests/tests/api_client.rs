//! Wire behavior of the API client against the test backend.

use axum::http::{Method, StatusCode};
use bookshelf_client::api::{ApiClient, ApiError, BookFilters, BookOrdering};
use bookshelf_core::{BookId, Credentials, Price, Registration};
use bookshelf_integration_tests::{TestBackend, fixtures};
use secrecy::SecretString;
use serde_json::json;

async fn backend() -> TestBackend {
    TestBackend::start().await.expect("backend")
}

fn client(backend: &TestBackend) -> ApiClient {
    ApiClient::new(&backend.config()).expect("client")
}

// =============================================================================
// Headers
// =============================================================================

#[tokio::test]
async fn test_authenticated_request_carries_bearer_token() {
    let backend = backend().await;
    backend.reply(Method::GET, "/orders/", StatusCode::OK, &fixtures::page(vec![]));

    let token = SecretString::from("abc123");
    let orders = client(&backend).orders(Some(&token)).await.expect("orders");
    assert!(orders.results.is_empty());

    let requests = backend.requests_to(&Method::GET, "/orders/");
    let request = requests.first().expect("request");
    assert_eq!(request.authorization.as_deref(), Some("Bearer abc123"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(request.query_value("page_size"), Some("100"));
}

#[tokio::test]
async fn test_anonymous_request_has_no_authorization() {
    let backend = backend().await;
    backend.reply(
        Method::GET,
        "/books/3/",
        StatusCode::OK,
        &fixtures::book(3, "War and Peace", "300.00", 4),
    );

    let book = client(&backend).book(BookId::new(3), None).await.expect("book");
    assert_eq!(book.title, "War and Peace");
    assert_eq!(book.price, Price::whole(300));

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests.first().expect("request").authorization.is_none());
}

// =============================================================================
// Catalog queries
// =============================================================================

#[tokio::test]
async fn test_book_filters_become_query_parameters() {
    let backend = backend().await;
    backend.reply(
        Method::GET,
        "/books/",
        StatusCode::OK,
        &fixtures::page(vec![fixtures::book(1, "Anna Karenina", "420.00", 2)]),
    );

    let filters = BookFilters {
        search: Some("  anna karenina ".to_string()),
        ordering: Some(BookOrdering::Newest),
        page: Some(2),
        ..BookFilters::default()
    };
    let page = client(&backend).books(&filters, None).await.expect("books");
    assert_eq!(page.results.len(), 1);

    let requests = backend.requests_to(&Method::GET, "/books/");
    let request = requests.first().expect("request");
    assert_eq!(request.query_value("search"), Some("anna karenina"));
    assert_eq!(request.query_value("ordering"), Some("-created_at"));
    assert_eq!(request.query_value("page"), Some("2"));
    assert_eq!(request.query_value("author"), None);
}

#[tokio::test]
async fn test_reviews_are_filtered_by_book() {
    let backend = backend().await;
    backend.reply(
        Method::GET,
        "/reviews/",
        StatusCode::OK,
        &fixtures::page(vec![fixtures::review(1, "boris", 5, "Superb")]),
    );

    let reviews = client(&backend)
        .reviews(BookId::new(9), None)
        .await
        .expect("reviews");
    assert_eq!(reviews.results.len(), 1);

    let requests = backend.requests_to(&Method::GET, "/reviews/");
    assert_eq!(requests.first().expect("request").query_value("book"), Some("9"));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_detail_reason_is_extracted() {
    let backend = backend().await;
    backend.reply(
        Method::POST,
        "/login/",
        StatusCode::UNAUTHORIZED,
        &json!({"detail": "No active account found with the given credentials"}),
    );

    let credentials = Credentials {
        username: "anna".to_string(),
        password: "wrong".to_string(),
    };
    let err = client(&backend).login(&credentials).await.expect_err("rejected");
    assert!(matches!(err, ApiError::Rejected { status, .. } if status == 401));
    assert_eq!(
        err.reason(),
        Some("No active account found with the given credentials")
    );
}

#[tokio::test]
async fn test_field_errors_are_flattened() {
    let backend = backend().await;
    backend.reply(
        Method::POST,
        "/register/",
        StatusCode::BAD_REQUEST,
        &json!({"username": ["A user with that username already exists."]}),
    );

    let registration = Registration {
        username: "anna".to_string(),
        email: "anna@example.com".to_string(),
        first_name: String::new(),
        last_name: String::new(),
        password: "hunter22".to_string(),
        password_confirm: "hunter22".to_string(),
    };
    let err = client(&backend)
        .register(&registration)
        .await
        .expect_err("rejected");
    assert_eq!(err.reason(), Some("A user with that username already exists."));

    let requests = backend.requests_to(&Method::POST, "/register/");
    let body = requests.first().and_then(|r| r.body.clone()).expect("body");
    assert_eq!(body.get("password_confirm"), Some(&json!("hunter22")));
}

#[tokio::test]
async fn test_unknown_route_is_rejected_with_not_found() {
    let backend = backend().await;

    let err = client(&backend)
        .book(BookId::new(404), None)
        .await
        .expect_err("missing");
    assert_eq!(err.reason(), Some("Not found."));
    assert!(!err.is_connectivity());
}

#[tokio::test]
async fn test_wrong_shape_is_reported() {
    let backend = backend().await;
    backend.reply_raw(Method::GET, "/authors/", StatusCode::OK, r#"{"authors": []}"#);

    let err = client(&backend).authors(None).await.expect_err("shape");
    assert!(matches!(err, ApiError::UnexpectedShape { .. }));
}
