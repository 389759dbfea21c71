//! Review schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BookId, Rating, ReviewId};

/// The reviewing user as nested in a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    /// Login name shown next to the review.
    pub username: String,
}

/// A published review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Backend ID.
    pub id: ReviewId,
    /// Author of the review.
    pub user: Reviewer,
    /// Star rating.
    pub rating: Rating,
    /// Free-text comment, may be empty.
    #[serde(default)]
    pub comment: String,
    /// Publication timestamp.
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /reviews/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    /// Reviewed book.
    pub book_id: BookId,
    /// Star rating.
    pub rating: Rating,
    /// Free-text comment.
    pub comment: String,
}
