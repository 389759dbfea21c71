//! Account view: login, registration, logout and the current user.

use askama::Template;
use bookshelf_core::{Credentials, Registration, User};

use super::{Outcome, format_date};
use crate::error::Result;
use crate::notice::Notice;
use crate::storage::DurableStore;
use crate::storefront::Storefront;

/// Account actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCommand {
    Login(Credentials),
    Register(Registration),
    Logout,
    Whoami,
}

/// User display data for templates.
#[derive(Debug, Clone)]
pub struct UserView {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub member_since: Option<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            display_name: user.display_name(),
            email: user.email.clone(),
            role: user.role.to_string(),
            member_since: user.created_at.as_ref().map(format_date),
        }
    }
}

#[derive(Template)]
#[template(path = "account.txt")]
pub struct AccountTemplate {
    pub user: UserView,
}

pub(crate) async fn handle<S: DurableStore>(storefront: &mut Storefront<S>, command: AccountCommand) -> Outcome {
    let result = match command {
        AccountCommand::Login(credentials) => login(storefront, &credentials).await,
        AccountCommand::Register(registration) => register(storefront, &registration).await,
        AccountCommand::Logout => logout(storefront),
        AccountCommand::Whoami => whoami(storefront),
    };
    result.into()
}

async fn login<S: DurableStore>(storefront: &mut Storefront<S>, credentials: &Credentials) -> Result<Outcome> {
    let user = storefront.session.login(&storefront.api, credentials).await?;
    Ok(Outcome::notice(Notice::success(format!(
        "Welcome, {}",
        user.display_name()
    ))))
}

async fn register<S: DurableStore>(storefront: &mut Storefront<S>, registration: &Registration) -> Result<Outcome> {
    let user = storefront.session.register(&storefront.api, registration).await?;
    Ok(Outcome::notice(Notice::success(format!(
        "Account created. Welcome, {}",
        user.display_name()
    ))))
}

fn logout<S: DurableStore>(storefront: &mut Storefront<S>) -> Result<Outcome> {
    storefront.session.logout()?;
    Ok(Outcome::notice(Notice::info("You have logged out")))
}

fn whoami<S: DurableStore>(storefront: &Storefront<S>) -> Result<Outcome> {
    let Some(user) = storefront.session.user() else {
        return Ok(Outcome::notice(Notice::info("Not logged in")));
    };
    let screen = AccountTemplate {
        user: UserView::from(user),
    }
    .render()?;
    Ok(Outcome::screen(screen))
}

#[cfg(test)]
mod tests {
    use bookshelf_core::{UserId, UserRole};

    use super::*;

    #[test]
    fn test_account_renders_user() {
        let user = User {
            id: UserId::new(1),
            username: "anna".to_string(),
            email: "anna@example.com".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Karenina".to_string(),
            role: UserRole::User,
            created_at: None,
        };

        let screen = AccountTemplate {
            user: UserView::from(&user),
        }
        .render()
        .expect("render");

        assert!(screen.contains("Anna Karenina (@anna)"));
        assert!(screen.contains("Email: anna@example.com"));
        assert!(screen.contains("Role: user"));
        assert!(!screen.contains("Member since"));
    }
}
