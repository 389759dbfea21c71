//! Book detail view and add-to-cart.

use askama::Template;
use bookshelf_core::{Book, BookId, Review};
use tracing::{instrument, warn};

use super::reviews::{self, ReviewInput, ReviewView};
use super::{Outcome, stock_label};
use crate::cart::AddOutcome;
use crate::error::{ActionError, Result};
use crate::notice::Notice;
use crate::storage::DurableStore;
use crate::storefront::Storefront;

pub const LOGIN_TO_ADD: &str = "Please log in to add items to the cart";
pub const OUT_OF_STOCK: &str = "This book is out of stock";

/// Book detail actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailCommand {
    Show(BookId),
    AddToCart(BookId),
    Review(ReviewInput),
}

/// Book display data for the detail template.
#[derive(Debug, Clone)]
pub struct BookDetailView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub author_bio: String,
    pub price: String,
    pub stock: String,
    pub description: String,
    pub cover: Option<String>,
    /// Out-of-stock books cannot be added to the cart.
    pub can_add: bool,
}

impl From<&Book> for BookDetailView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.name.clone(),
            author_bio: book.author.bio.clone(),
            price: book.price.to_string(),
            stock: stock_label(book.stock),
            description: book.description.clone(),
            cover: book.cover_image.clone(),
            can_add: book.in_stock(),
        }
    }
}

/// Book detail page template.
#[derive(Template)]
#[template(path = "detail.txt")]
pub struct BookDetailTemplate {
    pub book: BookDetailView,
    pub reviews: Vec<ReviewView>,
    /// Replaces the review list when empty or unavailable.
    pub reviews_note: Option<String>,
}

impl BookDetailTemplate {
    /// `reviews` is `None` when they could not be loaded.
    #[must_use]
    pub fn new(book: &Book, reviews: Option<&[Review]>) -> Self {
        let reviews_note = match reviews {
            None => Some("Could not load reviews".to_string()),
            Some([]) => Some("No reviews yet".to_string()),
            Some(_) => None,
        };
        Self {
            book: BookDetailView::from(book),
            reviews: reviews
                .unwrap_or_default()
                .iter()
                .map(ReviewView::from)
                .collect(),
            reviews_note,
        }
    }
}

#[instrument(skip(storefront))]
pub(crate) async fn handle<S: DurableStore>(storefront: &mut Storefront<S>, command: DetailCommand) -> Outcome {
    match command {
        DetailCommand::Show(id) => show(storefront, id).await.into(),
        DetailCommand::AddToCart(id) => add_to_cart(storefront, id).await.into(),
        DetailCommand::Review(input) => reviews::submit(storefront, &input).await.into(),
    }
}

async fn show<S: DurableStore>(storefront: &Storefront<S>, id: BookId) -> Result<Outcome> {
    let token = storefront.session.token();
    let book = storefront
        .api
        .book(id, token)
        .await
        .map_err(|err| ActionError::from_api(err, "Could not load the book", "Could not load the book"))?;

    // Reviews failing only degrades their section
    let reviews = match storefront.api.reviews(id, token).await {
        Ok(page) => Some(page.results),
        Err(err) => {
            warn!(book_id = %id, error = %err, "could not load reviews");
            None
        }
    };

    let screen = BookDetailTemplate::new(&book, reviews.as_deref()).render()?;
    Ok(Outcome::screen(screen))
}

async fn add_to_cart<S: DurableStore>(storefront: &mut Storefront<S>, id: BookId) -> Result<Outcome> {
    let Some(token) = storefront.session.token() else {
        return Err(ActionError::validation(LOGIN_TO_ADD));
    };

    let book = storefront
        .api
        .book(id, Some(token))
        .await
        .map_err(|err| ActionError::from_api(err, "Could not add to cart", "Could not add to cart"))?;
    if !book.in_stock() {
        return Err(ActionError::validation(OUT_OF_STOCK));
    }

    let message = match storefront.cart.add(id, Some(book))? {
        AddOutcome::Added => "Added to cart",
        AddOutcome::Incremented => "Quantity increased",
    };
    Ok(Outcome::notice(Notice::success(message)))
}
