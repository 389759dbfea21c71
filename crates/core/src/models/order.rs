//! Order schemas.
//!
//! Orders are priced by the backend. The client only sends book ids and
//! quantities; everything else in this module is read back from responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Book;
use crate::types::{BookId, OrderId, OrderStatus, Price};

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The ordered book as it was at order time.
    pub book: Book,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price charged.
    pub price: Price,
}

impl OrderItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Backend ID.
    pub id: OrderId,
    /// Ordered lines.
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Total computed by the backend.
    pub total_price: Price,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One requested line of `POST /create-order/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Requested book.
    pub book_id: BookId,
    /// Requested units.
    pub quantity: u32,
}

/// Body of `POST /create-order/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Requested lines, in cart order.
    pub items: Vec<OrderLine>,
}

impl OrderRequest {
    /// Whether the request has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<OrderLine> for OrderRequest {
    fn from_iter<I: IntoIterator<Item = OrderLine>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
