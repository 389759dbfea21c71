//! JSON payloads shaped like the bookstore API's responses.

use serde_json::{Value, json};

pub const CREATED_AT: &str = "2024-02-01T09:40:00Z";

pub fn author(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "bio": "",
        "created_at": CREATED_AT,
        "updated_at": CREATED_AT,
    })
}

/// A book by Leo Tolstoy; `price` is the backend's decimal string.
pub fn book(id: i64, title: &str, price: &str, stock: u32) -> Value {
    json!({
        "id": id,
        "title": title,
        "author": author(1, "Leo Tolstoy"),
        "price": price,
        "description": "",
        "stock": stock,
        "cover_image": null,
        "created_at": CREATED_AT,
        "updated_at": CREATED_AT,
    })
}

pub fn user(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "first_name": "",
        "last_name": "",
        "role": "user",
        "created_at": CREATED_AT,
    })
}

/// `/login/` and `/register/` answer.
pub fn auth(token: &str, user: Value) -> Value {
    json!({
        "user": user,
        "refresh": "refresh-token",
        "access": token,
    })
}

pub fn review(id: i64, username: &str, rating: i64, comment: &str) -> Value {
    json!({
        "id": id,
        "user": {"username": username},
        "rating": rating,
        "comment": comment,
        "created_at": CREATED_AT,
    })
}

/// An order holding `quantity` copies of `book` at its listed price.
pub fn order(id: i64, book: Value, quantity: u32, total: &str) -> Value {
    let price = book.get("price").cloned().unwrap_or(Value::Null);
    json!({
        "id": id,
        "user": {"id": 2, "username": "anna"},
        "items": [{"id": id * 10, "book": book, "quantity": quantity, "price": price}],
        "status": "pending",
        "total_price": total,
        "created_at": CREATED_AT,
    })
}

/// A list endpoint's page envelope.
pub fn page(results: Vec<Value>) -> Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
}
