//! Authors view.

use askama::Template;
use bookshelf_core::Author;

use super::Outcome;
use crate::error::{ActionError, Result};
use crate::storage::DurableStore;
use crate::storefront::Storefront;

/// Author display data for templates.
#[derive(Debug, Clone)]
pub struct AuthorCard {
    pub id: String,
    pub initials: String,
    pub name: String,
    pub bio: String,
}

impl From<&Author> for AuthorCard {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id.to_string(),
            initials: author.initials(),
            name: author.name.clone(),
            bio: author.bio.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "authors.txt")]
pub struct AuthorsTemplate {
    pub authors: Vec<AuthorCard>,
}

pub(crate) async fn handle<S: DurableStore>(storefront: &Storefront<S>) -> Outcome {
    list(storefront).await.into()
}

async fn list<S: DurableStore>(storefront: &Storefront<S>) -> Result<Outcome> {
    let page = storefront
        .api
        .authors(storefront.session.token())
        .await
        .map_err(|err| ActionError::from_api(err, "Could not load authors", "Could not load authors"))?;

    let screen = AuthorsTemplate {
        authors: page.results.iter().map(AuthorCard::from).collect(),
    }
    .render()?;
    Ok(Outcome::screen(screen))
}
