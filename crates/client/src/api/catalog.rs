//! Catalog endpoints: books, authors and reviews.

use bookshelf_core::{Author, AuthorId, Book, BookId, NewReview, Page, Review};
use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiClient, ApiError, ApiRequest};
use crate::cart::BookSource;

/// Sort order of the book list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookOrdering {
    TitleAsc,
    TitleDesc,
    PriceAsc,
    PriceDesc,
    Newest,
    Oldest,
}

impl BookOrdering {
    /// Value of the `ordering` query parameter.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::TitleAsc => "title",
            Self::TitleDesc => "-title",
            Self::PriceAsc => "price",
            Self::PriceDesc => "-price",
            Self::Newest => "-created_at",
            Self::Oldest => "created_at",
        }
    }
}

impl std::fmt::Display for BookOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}

impl std::str::FromStr for BookOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::TitleAsc),
            "-title" => Ok(Self::TitleDesc),
            "price" => Ok(Self::PriceAsc),
            "-price" => Ok(Self::PriceDesc),
            "-created_at" | "newest" => Ok(Self::Newest),
            "created_at" | "oldest" => Ok(Self::Oldest),
            _ => Err(format!("invalid ordering: {s}")),
        }
    }
}

/// Filters of the catalog list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilters {
    /// Free-text search over title and author.
    pub search: Option<String>,
    pub author: Option<AuthorId>,
    pub ordering: Option<BookOrdering>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl BookFilters {
    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query_opt(
                "search",
                self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            )
            .query_opt("author", self.author)
            .query_opt("ordering", self.ordering)
            .query_opt("price_min", self.price_min)
            .query_opt("price_max", self.price_max)
            .query_opt("page", self.page)
    }
}

impl ApiClient {
    /// `GET /books/` with filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a page of books.
    #[instrument(skip(self, token))]
    pub async fn books(
        &self,
        filters: &BookFilters,
        token: Option<&SecretString>,
    ) -> Result<Page<Book>, ApiError> {
        let request = filters.apply(ApiRequest::get("/books/").query("page_size", self.page_size()));
        self.fetch(&request, token).await
    }

    /// `GET /books/{id}/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a book.
    #[instrument(skip(self, token))]
    pub async fn book(&self, id: BookId, token: Option<&SecretString>) -> Result<Book, ApiError> {
        self.fetch(&ApiRequest::get(format!("/books/{id}/")), token)
            .await
    }

    /// `GET /authors/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a page of authors.
    #[instrument(skip(self, token))]
    pub async fn authors(&self, token: Option<&SecretString>) -> Result<Page<Author>, ApiError> {
        let request = ApiRequest::get("/authors/").query("page_size", self.page_size());
        self.fetch(&request, token).await
    }

    /// `GET /reviews/?book={id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a page of reviews.
    #[instrument(skip(self, token))]
    pub async fn reviews(
        &self,
        book_id: BookId,
        token: Option<&SecretString>,
    ) -> Result<Page<Review>, ApiError> {
        let request = ApiRequest::get("/reviews/")
            .query("book", book_id)
            .query("page_size", self.page_size());
        self.fetch(&request, token).await
    }

    /// `POST /reviews/` (authenticated).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a review.
    #[instrument(skip(self, review, token), fields(book_id = %review.book_id))]
    pub async fn create_review(
        &self,
        review: &NewReview,
        token: Option<&SecretString>,
    ) -> Result<Review, ApiError> {
        let request = ApiRequest::post("/reviews/", review)?.authenticated();
        self.fetch(&request, token).await
    }
}

/// Book lookups through the API, for cart snapshot resolution.
#[derive(Debug, Clone, Copy)]
pub struct ApiBooks<'a> {
    api: &'a ApiClient,
    token: Option<&'a SecretString>,
}

impl<'a> ApiBooks<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient, token: Option<&'a SecretString>) -> Self {
        Self { api, token }
    }
}

impl BookSource for ApiBooks<'_> {
    async fn fetch_book(&self, id: BookId) -> Result<Book, ApiError> {
        self.api.book(id, self.token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_query_values() {
        assert_eq!(BookOrdering::PriceDesc.as_query(), "-price");
        assert_eq!("-title".parse::<BookOrdering>(), Ok(BookOrdering::TitleDesc));
        assert_eq!("newest".parse::<BookOrdering>(), Ok(BookOrdering::Newest));
        assert!("rating".parse::<BookOrdering>().is_err());
    }

    #[test]
    fn test_filters_skip_blank_values() {
        let filters = BookFilters {
            search: Some("  ".to_string()),
            author: Some(AuthorId::new(2)),
            price_min: Some(Decimal::new(10_050, 2)),
            ..BookFilters::default()
        };
        let request = filters.apply(ApiRequest::get("/books/"));
        assert_eq!(
            request.query_pairs(),
            [
                ("author".to_string(), "2".to_string()),
                ("price_min".to_string(), "100.50".to_string()),
            ]
        );
    }
}
