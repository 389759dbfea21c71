//! Lazy resolution of missing book snapshots.

use std::future::Future;

use bookshelf_core::{Book, BookId};
use futures::future::join_all;
use tracing::{debug, warn};

use super::Cart;
use crate::api::ApiError;

/// Where missing snapshots are fetched from.
pub trait BookSource {
    /// Fetch one book by id.
    fn fetch_book(&self, id: BookId) -> impl Future<Output = Result<Book, ApiError>>;
}

/// Outcome of [`Cart::resolve_snapshots`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Books whose snapshot was attached.
    pub resolved: Vec<BookId>,
    /// Books that could not be fetched; they keep rendering as placeholders.
    pub failed: Vec<BookId>,
}

impl<S> Cart<S> {
    /// Fetch every book lacking a usable snapshot, concurrently.
    ///
    /// Failures are logged and leave the snapshot absent; the call itself
    /// never fails. Only the in-memory cart is updated.
    pub async fn resolve_snapshots<B: BookSource>(&mut self, source: &B) -> ResolveReport {
        let missing: Vec<BookId> = self
            .items
            .iter()
            .filter(|item| !item.has_snapshot())
            .map(|item| item.book_id)
            .collect();

        let mut report = ResolveReport::default();
        if missing.is_empty() {
            return report;
        }

        debug!(count = missing.len(), "resolving cart snapshots");
        let fetches = missing
            .into_iter()
            .map(|id| async move { (id, source.fetch_book(id).await) });

        for (id, result) in join_all(fetches).await {
            match result {
                Ok(book) => {
                    if let Some(item) = self.items.iter_mut().find(|item| item.book_id == id) {
                        item.book = Some(book);
                    }
                    report.resolved.push(id);
                }
                Err(err) => {
                    warn!(book_id = %id, error = %err, "could not resolve cart item");
                    report.failed.push(id);
                }
            }
        }
        report
    }
}
