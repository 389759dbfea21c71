//! Storefront views.
//!
//! Each view owns a command type and an async handler. A handler calls the
//! API and/or mutates the cart, then reports an [`Outcome`]: the notices to
//! show, the rendered page text and optionally the page to show next.
//!
//! Page text comes from askama templates under `templates/`. View models
//! hold preformatted strings so templates stay free of logic.

pub mod account;
pub mod authors;
pub mod cart;
pub mod catalog;
pub mod detail;
pub mod orders;
pub mod reviews;

use bookshelf_core::BookId;
use chrono::{DateTime, Utc};

use crate::error::ActionError;
use crate::notice::Notice;

pub use account::AccountCommand;
pub use cart::CartCommand;
pub use catalog::CatalogCommand;
pub use detail::DetailCommand;
pub use reviews::ReviewInput;

/// Shown for books or cart items whose details are not known yet.
pub const TITLE_PLACEHOLDER: &str = "Loading…";

const DATE_FORMAT: &str = "%-d %B %Y, %H:%M";

/// A page the storefront can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Catalog,
    Book(BookId),
    Authors,
    Cart,
    Orders,
}

impl Page {
    /// The command that shows this page.
    #[must_use]
    pub fn command(self) -> Command {
        match self {
            Self::Catalog => Command::Catalog(CatalogCommand::default()),
            Self::Book(id) => Command::Book(DetailCommand::Show(id)),
            Self::Authors => Command::Authors,
            Self::Cart => Command::Cart(CartCommand::Show),
            Self::Orders => Command::Orders,
        }
    }
}

/// Every user action, grouped by view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Catalog(CatalogCommand),
    Book(DetailCommand),
    Authors,
    Cart(CartCommand),
    Orders,
    Account(AccountCommand),
}

/// What a handler produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub notices: Vec<Notice>,
    /// Rendered page text.
    pub screen: Option<String>,
    /// Page to show next.
    pub next: Option<Page>,
}

impl Outcome {
    #[must_use]
    pub fn screen(screen: String) -> Self {
        Self {
            screen: Some(screen),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn notice(notice: Notice) -> Self {
        Self {
            notices: vec![notice],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    #[must_use]
    pub const fn then(mut self, page: Page) -> Self {
        self.next = Some(page);
        self
    }

    /// Report the error and show its notice.
    #[must_use]
    pub fn from_error(err: ActionError) -> Self {
        Self::notice(err.into_notice())
    }

    /// Append another outcome's notices and take its screen and next page.
    pub fn merge(&mut self, other: Self) {
        self.notices.extend(other.notices);
        if other.screen.is_some() {
            self.screen = other.screen;
        }
        self.next = other.next;
    }
}

impl From<crate::error::Result<Self>> for Outcome {
    fn from(result: crate::error::Result<Self>) -> Self {
        result.unwrap_or_else(Self::from_error)
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn stock_label(stock: u32) -> String {
    if stock > 0 {
        format!("In stock: {stock}")
    } else {
        "Out of stock".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = DateTime::from_timestamp(1_706_780_400, 0).expect("timestamp");
        assert_eq!(format_date(&date), "1 February 2024, 09:40");
    }

    #[test]
    fn test_stock_label() {
        assert_eq!(stock_label(3), "In stock: 3");
        assert_eq!(stock_label(0), "Out of stock");
    }

    #[test]
    fn test_merge_keeps_screen_when_other_has_none() {
        let mut outcome = Outcome::screen("cart".to_string()).with_notice(Notice::info("Removed"));
        outcome.merge(Outcome::notice(Notice::success("Done")).then(Page::Orders));
        assert_eq!(outcome.screen.as_deref(), Some("cart"));
        assert_eq!(outcome.notices.len(), 2);
        assert_eq!(outcome.next, Some(Page::Orders));
    }

    #[test]
    fn test_page_command() {
        assert_eq!(Page::Cart.command(), Command::Cart(CartCommand::Show));
        assert_eq!(
            Page::Book(BookId::new(2)).command(),
            Command::Book(DetailCommand::Show(BookId::new(2)))
        );
    }
}
