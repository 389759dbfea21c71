//! Review display and submission.

use bookshelf_core::{BookId, NewReview, Rating, Review};
use tracing::info;

use super::{Outcome, Page, format_date};
use crate::error::{ActionError, Result};
use crate::notice::Notice;
use crate::storage::DurableStore;
use crate::storefront::Storefront;

pub const LOGIN_TO_REVIEW: &str = "Please log in to leave a review";

/// A review as typed by the user; the rating is checked before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    pub book_id: BookId,
    pub rating: i64,
    pub comment: String,
}

/// Review display data for templates.
#[derive(Debug, Clone)]
pub struct ReviewView {
    pub stars: String,
    pub username: String,
    pub comment: String,
    pub date: String,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            stars: review.rating.stars(),
            username: review.user.username.clone(),
            comment: review.comment.clone(),
            date: format_date(&review.created_at),
        }
    }
}

pub(super) async fn submit<S: DurableStore>(storefront: &Storefront<S>, input: &ReviewInput) -> Result<Outcome> {
    let Some(token) = storefront.session.token() else {
        return Err(ActionError::validation(LOGIN_TO_REVIEW));
    };
    let rating = Rating::new(input.rating).map_err(|_| {
        ActionError::validation(format!(
            "Rating must be between {} and {}",
            Rating::MIN,
            Rating::MAX
        ))
    })?;

    let review = NewReview {
        book_id: input.book_id,
        rating,
        comment: input.comment.trim().to_string(),
    };
    let created = storefront
        .api
        .create_review(&review, Some(token))
        .await
        .map_err(|err| ActionError::from_api(err, "Could not submit the review", "Could not submit the review"))?;

    info!(review_id = %created.id, book_id = %input.book_id, "review submitted");
    Ok(Outcome::notice(Notice::success("Review submitted")).then(Page::Book(input.book_id)))
}
