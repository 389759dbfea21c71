//! Book and author schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AuthorId, BookId, Price};

/// A book author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Backend ID.
    pub id: AuthorId,
    /// Full display name.
    pub name: String,
    /// Short biography, may be empty.
    #[serde(default)]
    pub bio: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Author {
    /// Initials of the author name, e.g. `"LT"` for "Leo Tolstoy".
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

/// A book in the catalog.
///
/// This is also the snapshot a cart line item caches, so it must decode
/// from its own serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Backend ID.
    pub id: BookId,
    /// Title.
    pub title: String,
    /// Nested author record.
    pub author: Author,
    /// Unit price.
    pub price: Price,
    /// Long description, may be empty.
    #[serde(default)]
    pub description: String,
    /// Units in stock.
    pub stock: u32,
    /// Absolute URL of the cover image.
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Whether at least one unit can be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
