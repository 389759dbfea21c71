//! Catalog view.

use askama::Template;
use bookshelf_core::{Author, Book, Page as ResultPage};
use tracing::{instrument, warn};

use super::{Outcome, stock_label};
use crate::api::BookFilters;
use crate::error::{ActionError, Result};
use crate::storage::DurableStore;
use crate::storefront::Storefront;

/// Catalog actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCommand {
    /// List books matching the filters.
    Browse(BookFilters),
}

impl Default for CatalogCommand {
    fn default() -> Self {
        Self::Browse(BookFilters::default())
    }
}

/// Book display data for templates.
#[derive(Debug, Clone)]
pub struct BookCard {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: String,
    pub stock: String,
}

impl From<&Book> for BookCard {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.name.clone(),
            price: book.price.to_string(),
            stock: stock_label(book.stock),
        }
    }
}

/// Catalog page template.
#[derive(Template)]
#[template(path = "catalog.txt")]
pub struct CatalogTemplate {
    pub books: Vec<BookCard>,
    pub count: Option<u64>,
    pub page: u32,
    pub next_page: Option<u32>,
    /// Author filter choices, preformatted as `id = name` pairs.
    pub authors: String,
}

impl CatalogTemplate {
    #[must_use]
    pub fn new(page: &ResultPage<Book>, filters: &BookFilters, authors: &[Author]) -> Self {
        let current = filters.page.unwrap_or(1);
        Self {
            books: page.results.iter().map(BookCard::from).collect(),
            count: page.count,
            page: current,
            next_page: page.has_next().then(|| current.saturating_add(1)),
            authors: authors
                .iter()
                .map(|author| format!("{} = {}", author.id, author.name))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[instrument(skip(storefront))]
pub(crate) async fn handle<S: DurableStore>(storefront: &mut Storefront<S>, command: CatalogCommand) -> Outcome {
    match command {
        CatalogCommand::Browse(filters) => browse(storefront, &filters).await.into(),
    }
}

async fn browse<S: DurableStore>(storefront: &Storefront<S>, filters: &BookFilters) -> Result<Outcome> {
    let token = storefront.session.token();
    let books = storefront
        .api
        .books(filters, token)
        .await
        .map_err(|err| ActionError::from_api(err, "Could not load books", "Could not load books"))?;

    // The author filter is optional; a failure only hides it
    let authors = match storefront.api.authors(token).await {
        Ok(page) => page.results,
        Err(err) => {
            warn!(error = %err, "could not load authors for the filter");
            Vec::new()
        }
    };

    let screen = CatalogTemplate::new(&books, filters, &authors).render()?;
    Ok(Outcome::screen(screen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{author, book};

    #[test]
    fn test_catalog_renders_cards() {
        let mut sold_out = book(2, 120);
        sold_out.title = "Dead Souls".to_string();
        sold_out.stock = 0;
        let page = ResultPage {
            count: Some(2),
            next: Some("http://localhost:8000/api/books/?page=2".to_string()),
            previous: None,
            results: vec![book(1, 300), sold_out],
        };

        let screen = CatalogTemplate::new(&page, &BookFilters::default(), &[author(1, "Leo Tolstoy")])
            .render()
            .expect("render");

        assert!(screen.contains("Catalog (2 books)"));
        assert!(screen.contains("#1 Book 1"));
        assert!(screen.contains("300.00 ₽ | In stock: 5"));
        assert!(screen.contains("#2 Dead Souls"));
        assert!(screen.contains("Out of stock"));
        assert!(screen.contains("Page 1 (next: 2)"));
        assert!(screen.contains("Authors: 1 = Leo Tolstoy"));
        assert!(!screen.contains("No books found"));
    }

    #[test]
    fn test_empty_catalog() {
        let screen = CatalogTemplate::new(&ResultPage::of(Vec::new()), &BookFilters::default(), &[])
            .render()
            .expect("render");
        assert!(screen.contains("No books found"));
        assert!(!screen.contains("Authors:"));
    }
}
