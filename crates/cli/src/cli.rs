//! Command-line arguments and their mapping onto storefront commands.

use bookshelf_client::api::{BookFilters, BookOrdering};
use bookshelf_client::views::{AccountCommand, CartCommand, CatalogCommand, Command, DetailCommand, ReviewInput};
use bookshelf_core::{AuthorId, BookId, Credentials, Registration};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Debug, Parser)]
#[command(name = "bookshelf")]
#[command(author, version, about = "Bookshelf terminal storefront")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse the catalog
    Books {
        /// Search titles, descriptions and authors
        #[arg(short, long)]
        search: Option<String>,

        /// Only books by this author id
        #[arg(short, long)]
        author: Option<AuthorId>,

        /// Sort order (title, -title, price, -price, newest, oldest)
        #[arg(short, long, allow_hyphen_values = true)]
        ordering: Option<BookOrdering>,

        /// Lowest price
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Highest price
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Page number, starting at 1
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Show a book with its reviews
    Book {
        id: BookId,
    },
    /// List authors
    Authors,
    /// Review a book
    Review {
        book_id: BookId,

        /// Stars from 1 to 5
        #[arg(short, long, allow_negative_numbers = true)]
        rating: i64,

        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Place an order for the cart
    Checkout,
    /// Show order history
    Orders,
    /// Log in
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "BOOKSHELF_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        #[arg(short, long, env = "BOOKSHELF_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, env = "BOOKSHELF_PASSWORD_CONFIRM", hide_env_values = true)]
        password_confirm: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add one copy of a book
    Add { book_id: BookId },
    /// Increase the quantity at a position
    Inc { position: usize },
    /// Decrease the quantity at a position
    Dec { position: usize },
    /// Remove the item at a position
    Remove { position: usize },
    /// Empty the cart
    Clear,
}

impl Commands {
    /// The storefront command this invocation runs.
    #[must_use]
    pub fn into_command(self) -> Command {
        match self {
            Self::Books {
                search,
                author,
                ordering,
                min_price,
                max_price,
                page,
            } => Command::Catalog(CatalogCommand::Browse(BookFilters {
                search,
                author,
                ordering,
                price_min: min_price,
                price_max: max_price,
                page,
            })),
            Self::Book { id } => Command::Book(DetailCommand::Show(id)),
            Self::Authors => Command::Authors,
            Self::Review {
                book_id,
                rating,
                comment,
            } => Command::Book(DetailCommand::Review(ReviewInput {
                book_id,
                rating,
                comment,
            })),
            Self::Cart { action } => match action.unwrap_or(CartAction::Show) {
                CartAction::Show => Command::Cart(CartCommand::Show),
                CartAction::Add { book_id } => Command::Book(DetailCommand::AddToCart(book_id)),
                CartAction::Inc { position } => Command::Cart(CartCommand::Increment(position)),
                CartAction::Dec { position } => Command::Cart(CartCommand::Decrement(position)),
                CartAction::Remove { position } => Command::Cart(CartCommand::Remove(position)),
                CartAction::Clear => Command::Cart(CartCommand::Clear),
            },
            Self::Checkout => Command::Cart(CartCommand::Checkout),
            Self::Orders => Command::Orders,
            Self::Login { username, password } => {
                Command::Account(AccountCommand::Login(Credentials { username, password }))
            }
            Self::Register {
                username,
                email,
                first_name,
                last_name,
                password,
                password_confirm,
            } => Command::Account(AccountCommand::Register(Registration {
                username,
                email,
                first_name,
                last_name,
                password,
                password_confirm,
            })),
            Self::Logout => Command::Account(AccountCommand::Logout),
            Self::Whoami => Command::Account(AccountCommand::Whoami),
        }
    }
}
