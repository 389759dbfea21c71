//! Cart view.
//!
//! Positions shown to the user are 1-based; the cart model is indexed from
//! zero.

use askama::Template;
use tracing::instrument;

use super::{Outcome, Page, TITLE_PLACEHOLDER};
use crate::api::ApiBooks;
use crate::cart::{Cart, LineItem};
use crate::checkout::submit_order;
use crate::error::{ActionError, Result};
use crate::notice::Notice;
use crate::storage::DurableStore;
use crate::storefront::Storefront;

/// Cart actions. Positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartCommand {
    Show,
    Increment(usize),
    Decrement(usize),
    Remove(usize),
    Clear,
    Checkout,
}

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub position: usize,
    pub title: String,
    pub author: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl CartItemView {
    fn new(position: usize, item: &LineItem) -> Self {
        let book = item.book.as_ref().filter(|_| item.has_snapshot());
        Self {
            position,
            title: book.map_or_else(|| TITLE_PLACEHOLDER.to_string(), |book| book.title.clone()),
            author: book.map(|book| book.author.name.clone()).unwrap_or_default(),
            quantity: item.quantity,
            price: item.unit_price().to_string(),
            line_price: item.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl<S> From<&Cart<S>> for CartView {
    fn from(cart: &Cart<S>) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| CartItemView::new(index + 1, item))
                .collect(),
            total: cart.total_price().to_string(),
            item_count: cart.total_count(),
        }
    }
}

/// Cart page template.
#[derive(Template)]
#[template(path = "cart.txt")]
pub struct CartTemplate {
    pub cart: CartView,
}

#[instrument(skip(storefront))]
pub(crate) async fn handle<S: DurableStore>(storefront: &mut Storefront<S>, command: CartCommand) -> Outcome {
    let result = match command {
        CartCommand::Show => Ok(Outcome::default()),
        CartCommand::Increment(position) => change(storefront, position, 1),
        CartCommand::Decrement(position) => change(storefront, position, -1),
        CartCommand::Remove(position) => remove(storefront, position),
        CartCommand::Clear => storefront
            .cart
            .clear()
            .map(|()| Outcome::notice(Notice::info("Cart cleared")))
            .map_err(ActionError::from),
        CartCommand::Checkout => return checkout(storefront).await.into(),
    };

    // The cart is shown after every cart action, failed or not
    let mut outcome = Outcome::from(result);
    outcome.merge(show(storefront).await.into());
    outcome
}

fn index_of(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| ActionError::validation("Positions start at 1"))
}

fn change<S: DurableStore>(storefront: &mut Storefront<S>, position: usize, delta: i64) -> Result<Outcome> {
    storefront.cart.change_quantity(index_of(position)?, delta)?;
    Ok(Outcome::default())
}

fn remove<S: DurableStore>(storefront: &mut Storefront<S>, position: usize) -> Result<Outcome> {
    storefront.cart.remove(index_of(position)?)?;
    Ok(Outcome::notice(Notice::info("Removed from cart")))
}

async fn show<S: DurableStore>(storefront: &mut Storefront<S>) -> Result<Outcome> {
    let source = ApiBooks::new(&storefront.api, storefront.session.token());
    storefront.cart.resolve_snapshots(&source).await;

    let screen = CartTemplate {
        cart: CartView::from(&storefront.cart),
    }
    .render()?;
    Ok(Outcome::screen(screen))
}

async fn checkout<S: DurableStore>(storefront: &mut Storefront<S>) -> Result<Outcome> {
    let placed = submit_order(&storefront.api, storefront.session.token(), &mut storefront.cart).await?;

    let mut outcome = Outcome::notice(Notice::success("Order placed successfully")).then(Page::Orders);
    if let Some(err) = placed.persist_error {
        outcome = outcome.with_notice(ActionError::from(err).into_notice());
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use bookshelf_core::BookId;

    use super::*;
    use crate::cart::CartError;
    use crate::storage::MemoryStore;
    use crate::test_support::book;

    #[test]
    fn test_cart_renders_positions_and_totals() {
        let mut cart = Cart::load(MemoryStore::new()).expect("load");
        cart.add(BookId::new(1), Some(book(1, 300))).expect("add");
        cart.add(BookId::new(1), None).expect("add");
        cart.add(BookId::new(2), None).expect("add");

        let screen = CartTemplate {
            cart: CartView::from(&cart),
        }
        .render()
        .expect("render");

        assert!(screen.contains("1. Book 1 (Leo Tolstoy)"));
        assert!(screen.contains("300.00 ₽ x 2 = 600.00 ₽"));
        assert!(screen.contains("2. Loading…"));
        assert!(screen.contains("0.00 ₽ x 1 = 0.00 ₽"));
        assert!(screen.contains("Items: 3"));
        assert!(screen.contains("Total: 600.00 ₽"));
    }

    #[test]
    fn test_empty_cart_renders_message() {
        let cart = Cart::load(MemoryStore::new()).expect("load");
        let screen = CartTemplate {
            cart: CartView::from(&cart),
        }
        .render()
        .expect("render");
        assert!(screen.contains("Your cart is empty"));
        assert!(!screen.contains("Total:"));
    }

    #[test]
    fn test_out_of_range_position_is_a_validation_error() {
        let err = ActionError::from(CartError::IndexOutOfRange { index: 4, len: 2 });
        assert_eq!(err.notice(), Notice::warning("No item at position 5"));
        assert!(index_of(0).is_err());
        assert_eq!(index_of(1).ok(), Some(0));
    }
}
