//! Fixtures for unit tests.

use bookshelf_core::{Author, AuthorId, Book, BookId, Price, Rating, Review, ReviewId, Reviewer};
use chrono::{DateTime, Utc};

pub fn timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(1_706_780_400, 0).expect("timestamp")
}

pub fn author(id: i64, name: &str) -> Author {
    Author {
        id: AuthorId::new(id),
        name: name.to_string(),
        bio: String::new(),
        created_at: None,
        updated_at: None,
    }
}

/// `Book {id}` by Leo Tolstoy, five in stock.
pub fn book(id: i64, price: i64) -> Book {
    Book {
        id: BookId::new(id),
        title: format!("Book {id}"),
        author: author(1, "Leo Tolstoy"),
        price: Price::whole(price),
        description: String::new(),
        stock: 5,
        cover_image: None,
        created_at: timestamp(),
        updated_at: None,
    }
}

pub fn review(id: i64, rating: i64, comment: &str) -> Review {
    Review {
        id: ReviewId::new(id),
        user: Reviewer {
            username: format!("reader{id}"),
        },
        rating: Rating::new(rating).expect("rating"),
        comment: comment.to_string(),
        created_at: timestamp(),
    }
}
