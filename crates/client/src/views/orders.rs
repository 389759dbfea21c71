//! Order history view.

use askama::Template;
use bookshelf_core::{Order, OrderItem};

use super::{Outcome, format_date};
use crate::error::{ActionError, Result};
use crate::storage::DurableStore;
use crate::storefront::Storefront;

pub const LOGIN_TO_VIEW_ORDERS: &str = "Please log in to see your orders";

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub title: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&OrderItem> for OrderLineView {
    fn from(item: &OrderItem) -> Self {
        Self {
            title: item.book.title.clone(),
            quantity: item.quantity,
            line_total: item.line_total().to_string(),
        }
    }
}

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub status: &'static str,
    pub date: String,
    pub lines: Vec<OrderLineView>,
    pub total: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            status: order.status.label(),
            date: format_date(&order.created_at),
            lines: order.items.iter().map(OrderLineView::from).collect(),
            total: order.total_price.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "orders.txt")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
}

pub(crate) async fn handle<S: DurableStore>(storefront: &Storefront<S>) -> Outcome {
    history(storefront).await.into()
}

async fn history<S: DurableStore>(storefront: &Storefront<S>) -> Result<Outcome> {
    let Some(token) = storefront.session.token() else {
        return Err(ActionError::validation(LOGIN_TO_VIEW_ORDERS));
    };

    let page = storefront
        .api
        .orders(Some(token))
        .await
        .map_err(|err| ActionError::from_api(err, "Could not load orders", "Could not load orders"))?;

    let screen = OrdersTemplate {
        orders: page.results.iter().map(OrderView::from).collect(),
    }
    .render()?;
    Ok(Outcome::screen(screen))
}
