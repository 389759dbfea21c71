//! Client-side cart.
//!
//! The cart is an ordered list of line items, at most one per book, each
//! with a quantity of at least one. It is loaded from durable storage once
//! and the whole snapshot is rewritten after every mutation, before the
//! mutating call returns.
//!
//! Line items may cache a [`Book`] snapshot for display. Snapshots are
//! never sent to the backend; orders carry only ids and quantities and the
//! backend prices them.

mod resolve;

pub use resolve::{BookSource, ResolveReport};

use bookshelf_core::{Book, BookId, OrderLine, OrderRequest, Price};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{DurableStore, StorageError, keys};

/// Errors that can occur when mutating the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// No line item at the given position.
    #[error("no cart item at index {index} (cart has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The mutation was applied but could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One book in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub book_id: BookId,
    pub quantity: u32,
    /// Cached book for display; absent until resolved.
    #[serde(default, deserialize_with = "lenient_snapshot")]
    pub book: Option<Book>,
}

impl LineItem {
    /// Whether the cached snapshot can be displayed.
    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.book.as_ref().is_some_and(|book| !book.title.is_empty())
    }

    /// Snapshot price, or zero while the book is unknown.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.book.as_ref().map_or(Price::ZERO, |book| book.price)
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price().times(self.quantity)
    }
}

/// A snapshot that is not a complete book is treated as absent.
fn lenient_snapshot<'de, D>(deserializer: D) -> Result<Option<Book>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// Persisted form accepted on load; quantity is signed so bad entries can be dropped.
#[derive(Deserialize)]
struct StoredLineItem {
    book_id: BookId,
    quantity: i64,
    #[serde(default, deserialize_with = "lenient_snapshot")]
    book: Option<Book>,
}

/// What [`Cart::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line item was appended.
    Added,
    /// The book was already in the cart; its quantity went up by one.
    Incremented,
}

/// What [`Cart::change_quantity`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The item now has this quantity.
    Updated(u32),
    /// The quantity reached zero and the item was removed.
    Removed,
}

/// The cart and the store it persists to.
#[derive(Debug)]
pub struct Cart<S> {
    items: Vec<LineItem>,
    store: S,
}

impl<S: DurableStore> Cart<S> {
    /// Load the persisted cart.
    ///
    /// A snapshot that is not a JSON array is discarded and the cart starts
    /// empty. Entries with a quantity below one are dropped and duplicate
    /// books are merged into the first entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(store: S) -> Result<Self, StorageError> {
        let items = match store.read(keys::CART)? {
            Some(raw) => parse_snapshot(&raw),
            None => Vec::new(),
        };
        debug!(items = items.len(), "cart loaded");
        Ok(Self { items, store })
    }

    /// Add one unit of a book.
    ///
    /// `snapshot` is cached for display when the book is new to the cart or
    /// its cached snapshot is unusable.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the in-memory
    /// cart keeps the change.
    pub fn add(&mut self, book_id: BookId, snapshot: Option<Book>) -> Result<AddOutcome, StorageError> {
        let outcome = if let Some(item) = self.items.iter_mut().find(|item| item.book_id == book_id) {
            item.quantity = item.quantity.saturating_add(1);
            if !item.has_snapshot() && snapshot.is_some() {
                item.book = snapshot;
            }
            AddOutcome::Incremented
        } else {
            self.items.push(LineItem {
                book_id,
                quantity: 1,
                book: snapshot,
            });
            AddOutcome::Added
        };

        debug!(%book_id, ?outcome, "cart add");
        self.persist()?;
        Ok(outcome)
    }

    /// Change the quantity of the item at `index` by `delta`.
    ///
    /// A resulting quantity of zero or less removes the item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] without touching the cart, or
    /// [`CartError::Storage`] if the change could not be persisted.
    pub fn change_quantity(&mut self, index: usize, delta: i64) -> Result<QuantityChange, CartError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CartError::IndexOutOfRange { index, len })?;

        let next = i64::from(item.quantity).saturating_add(delta);
        let change = if next <= 0 {
            self.items.remove(index);
            QuantityChange::Removed
        } else {
            item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
            QuantityChange::Updated(item.quantity)
        };

        debug!(index, delta, ?change, "cart quantity changed");
        self.persist()?;
        Ok(change)
    }

    /// Remove the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] without touching the cart, or
    /// [`CartError::Storage`] if the change could not be persisted.
    pub fn remove(&mut self, index: usize) -> Result<LineItem, CartError> {
        let len = self.items.len();
        if index >= len {
            return Err(CartError::IndexOutOfRange { index, len });
        }
        let removed = self.items.remove(index);

        debug!(index, book_id = %removed.book_id, "cart item removed");
        self.persist()?;
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cart could not be persisted.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.items.clear();
        debug!("cart cleared");
        self.persist()
    }

    /// Rewrite the persisted snapshot from memory.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn persist(&self) -> Result<(), StorageError> {
        let snapshot = serde_json::to_string(&self.items).map_err(|source| StorageError::Serialize {
            key: keys::CART.to_string(),
            source,
        })?;
        self.store.write(keys::CART, &snapshot)
    }
}

impl<S> Cart<S> {
    /// Line items in add order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price times quantity; unknown books count as zero.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |sum, item| sum.saturating_add(u64::from(item.quantity)))
    }

    /// The order payload for the current cart, in cart order.
    #[must_use]
    pub fn order_request(&self) -> OrderRequest {
        self.items
            .iter()
            .map(|item| OrderLine {
                book_id: item.book_id,
                quantity: item.quantity,
            })
            .collect()
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

fn parse_snapshot(raw: &str) -> Vec<LineItem> {
    let entries = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("stored cart is not a JSON array, starting with an empty cart");
            return Vec::new();
        }
        Err(err) => {
            warn!(error = %err, "stored cart is not valid JSON, starting with an empty cart");
            return Vec::new();
        }
    };

    let mut items: Vec<LineItem> = Vec::with_capacity(entries.len());
    for entry in entries {
        let stored = match serde_json::from_value::<StoredLineItem>(entry) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "dropping unreadable cart entry");
                continue;
            }
        };
        if stored.quantity <= 0 {
            continue;
        }
        let quantity = u32::try_from(stored.quantity).unwrap_or(u32::MAX);

        if let Some(existing) = items.iter_mut().find(|item| item.book_id == stored.book_id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            if !existing.has_snapshot() && stored.book.is_some() {
                existing.book = stored.book;
            }
        } else {
            items.push(LineItem {
                book_id: stored.book_id,
                quantity,
                book: stored.book,
            });
        }
    }
    items
}
