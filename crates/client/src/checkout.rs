//! Order submission.

use bookshelf_core::Order;
use secrecy::SecretString;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::cart::Cart;
use crate::error::ActionError;
use crate::storage::{DurableStore, StorageError};

pub const LOGIN_REQUIRED: &str = "Please log in to place an order";
pub const EMPTY_CART: &str = "Your cart is empty";
pub const ORDER_FALLBACK: &str = "Could not place the order";

/// An order the backend accepted.
#[derive(Debug)]
pub struct PlacedOrder {
    /// The created order, when the response could be read.
    pub order: Option<Order>,
    /// Set when the emptied cart could not be persisted.
    pub persist_error: Option<StorageError>,
}

/// Submit the cart as an order.
///
/// Requires a token and a non-empty cart; otherwise no request is made. On
/// success the cart is cleared. On any failure it is left untouched.
///
/// # Errors
///
/// Returns [`ActionError::Validation`] for a missing token or an empty
/// cart, and the classified API error when the backend refuses the order or
/// cannot be reached.
#[instrument(skip_all, fields(lines = cart.len()))]
pub async fn submit_order<S: DurableStore>(
    api: &ApiClient,
    token: Option<&SecretString>,
    cart: &mut Cart<S>,
) -> Result<PlacedOrder, ActionError> {
    let Some(token) = token else {
        return Err(ActionError::validation(LOGIN_REQUIRED));
    };
    if cart.is_empty() {
        return Err(ActionError::validation(EMPTY_CART));
    }

    let request = cart.order_request();
    let receipt = api
        .create_order(&request, Some(token))
        .await
        .map_err(|err| ActionError::from_api(err, "Order failed", ORDER_FALLBACK))?;

    let persist_error = cart.clear().err();
    info!(
        order_id = ?receipt.order.as_ref().map(|order| order.id),
        "order placed"
    );

    Ok(PlacedOrder {
        order: receipt.order,
        persist_error,
    })
}
