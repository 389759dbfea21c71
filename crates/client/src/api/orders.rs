//! Order endpoints.

use bookshelf_core::{Order, OrderRequest, Page};
use secrecy::SecretString;
use tracing::{instrument, warn};

use super::{ApiClient, ApiError, ApiRequest, decode};

/// Result of an accepted `POST /create-order/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    /// The created order, when the body decoded.
    pub order: Option<Order>,
}

impl ApiClient {
    /// `GET /orders/` (authenticated).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a page of orders.
    #[instrument(skip(self, token))]
    pub async fn orders(&self, token: Option<&SecretString>) -> Result<Page<Order>, ApiError> {
        let request = ApiRequest::get("/orders/")
            .query("page_size", self.page_size())
            .authenticated();
        self.fetch(&request, token).await
    }

    /// `POST /create-order/` (authenticated).
    ///
    /// Any success status means the order exists server-side. A success body
    /// that does not decode is logged and reported as a receipt without an
    /// order instead of an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the backend refuses the order and
    /// [`ApiError::Http`] when it could not be reached.
    #[instrument(skip(self, order, token), fields(lines = order.items.len()))]
    pub async fn create_order(
        &self,
        order: &OrderRequest,
        token: Option<&SecretString>,
    ) -> Result<OrderReceipt, ApiError> {
        let request = ApiRequest::post("/create-order/", order)?.authenticated();
        let body = self.fetch_text(&request, token).await?;

        let order = match decode::<Order>(request.path(), &body) {
            Ok(order) => Some(order),
            Err(err) => {
                warn!(error = %err, "order accepted but response could not be read");
                None
            }
        };
        Ok(OrderReceipt { order })
    }
}
