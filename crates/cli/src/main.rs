//! Bookshelf - Terminal storefront for the bookstore REST API.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! bookshelf books --search tolstoy --ordering -price
//!
//! # Log in (password from BOOKSHELF_PASSWORD or --password)
//! bookshelf login -u anna
//!
//! # Fill the cart and place an order
//! bookshelf cart add 3
//! bookshelf cart inc 1
//! bookshelf checkout
//! ```
//!
//! # Commands
//!
//! - `books`, `book`, `authors` - Catalog
//! - `review` - Review a book
//! - `cart`, `checkout` - Cart and order submission
//! - `orders` - Order history
//! - `login`, `register`, `logout`, `whoami` - Account
//!
//! The token and cart live under `BOOKSHELF_DATA_DIR` between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use bookshelf_client::storage::FileStore;
use bookshelf_client::views::Outcome;
use bookshelf_client::{ClientConfig, Storefront};
use clap::Parser;

mod cli;
mod telemetry;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = parse_args(None, std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Sentry must be initialized before the tracing subscriber
    let config = ClientConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(telemetry::init_sentry);
    telemetry::init_tracing(cli.verbose);

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Parse the command line after loading `.env` (or `env_file`), so that
/// clap's `env` fallbacks see the file's variables.
fn parse_args<I, T>(env_file: Option<&Path>, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    // A missing file is fine
    match env_file {
        Some(path) => {
            let _ = dotenvy::from_path(path);
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }
    Cli::try_parse_from(args)
}

async fn run(cli: Cli, config: ClientConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = FileStore::new(config.data_dir.clone());
    let mut storefront = Storefront::start(config, store).await?;

    let outcome = storefront.dispatch(cli.command.into_command()).await;
    print_outcome(&mut io::stdout().lock(), &outcome)?;

    if outcome.notices.iter().any(bookshelf_client::Notice::is_error) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_outcome(out: &mut impl Write, outcome: &Outcome) -> io::Result<()> {
    for notice in &outcome.notices {
        writeln!(out, "{notice}")?;
    }
    if let Some(screen) = &outcome.screen {
        if !outcome.notices.is_empty() {
            writeln!(out)?;
        }
        writeln!(out, "{}", screen.trim_end())?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use bookshelf_client::Notice;
    use bookshelf_client::views::{AccountCommand, Command};

    use super::*;

    #[test]
    fn test_env_file_feeds_password_fallbacks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env_file = dir.path().join(".env");
        std::fs::write(
            &env_file,
            "BOOKSHELF_PASSWORD=from-dotenv\nBOOKSHELF_PASSWORD_CONFIRM=from-dotenv-confirm\n",
        )
        .expect("write .env");

        let cli = parse_args(
            Some(&env_file),
            ["bookshelf", "register", "-u", "boris", "-e", "boris@example.com"],
        )
        .expect("password taken from .env");

        let Command::Account(AccountCommand::Register(registration)) = cli.command.into_command() else {
            panic!("expected register command");
        };
        assert_eq!(registration.password, "from-dotenv");
        assert_eq!(registration.password_confirm, "from-dotenv-confirm");
    }

    #[test]
    fn test_print_outcome_notices_then_screen() {
        let outcome = Outcome::screen("Cart\nYour cart is empty\n".to_string())
            .with_notice(Notice::info("Cart cleared"));
        let mut out = Vec::new();
        print_outcome(&mut out, &outcome).expect("print");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "[info] Cart cleared\n\nCart\nYour cart is empty\n"
        );
    }

    #[test]
    fn test_print_outcome_without_screen() {
        let outcome = Outcome::notice(Notice::success("Added to cart"));
        let mut out = Vec::new();
        print_outcome(&mut out, &outcome).expect("print");
        assert_eq!(String::from_utf8(out).expect("utf8"), "[success] Added to cart\n");
    }
}
