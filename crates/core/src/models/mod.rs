//! Wire schemas of the bookstore REST API.
//!
//! Every response body the client consumes is decoded into one of these
//! types. A body that does not match fails decoding instead of leaking
//! missing fields into the views.

pub mod book;
pub mod order;
pub mod page;
pub mod review;
pub mod user;

pub use book::{Author, Book};
pub use order::{Order, OrderItem, OrderLine, OrderRequest};
pub use page::Page;
pub use review::{NewReview, Review, Reviewer};
pub use user::{AuthResponse, Credentials, Registration, User};
