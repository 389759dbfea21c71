//! The storefront context.
//!
//! One [`Storefront`] exists per process. It owns the API client, the
//! session and the cart; views borrow it for the duration of one command.

use thiserror::Error;
use tracing::{instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::cart::Cart;
use crate::config::ClientConfig;
use crate::session::SessionStore;
use crate::storage::{DurableStore, StorageError};
use crate::views::{self, Command, Outcome};

/// Page transitions followed by a single dispatch.
const MAX_TRANSITIONS: usize = 4;

/// Errors that prevent the storefront from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not create the API client: {0}")]
    Api(#[from] ApiError),

    #[error("could not read local data: {0}")]
    Storage(#[from] StorageError),
}

/// Application context shared by every view.
#[derive(Debug)]
pub struct Storefront<S> {
    pub(crate) config: ClientConfig,
    pub(crate) api: ApiClient,
    pub(crate) session: SessionStore<S>,
    pub(crate) cart: Cart<S>,
}

impl<S: DurableStore + Clone> Storefront<S> {
    /// Load the cart and the persisted token. The session user stays
    /// unknown until [`Storefront::start`] or a login.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or local data
    /// cannot be read.
    pub fn new(config: ClientConfig, store: S) -> Result<Self, StartupError> {
        let api = ApiClient::new(&config)?;
        let session = SessionStore::load(store.clone())?;
        let cart = Cart::load(store)?;

        Ok(Self {
            config,
            api,
            session,
            cart,
        })
    }

    /// [`Storefront::new`] followed by session restore.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Storefront::new`], or a storage error if an
    /// invalid token could not be removed.
    pub async fn start(config: ClientConfig, store: S) -> Result<Self, StartupError> {
        let mut storefront = Self::new(config, store)?;
        storefront.session.restore(&storefront.api).await?;
        Ok(storefront)
    }
}

impl<S: DurableStore> Storefront<S> {
    /// Run a command and follow the page transitions it requests.
    #[instrument(skip(self))]
    pub async fn dispatch(&mut self, command: Command) -> Outcome {
        let mut outcome = self.handle(command).await;

        let mut transitions = 0;
        while let Some(page) = outcome.next.take() {
            if transitions == MAX_TRANSITIONS {
                warn!(?page, "too many page transitions, stopping");
                break;
            }
            transitions += 1;
            let next = self.handle(page.command()).await;
            outcome.merge(next);
        }
        outcome
    }

    async fn handle(&mut self, command: Command) -> Outcome {
        match command {
            Command::Catalog(command) => views::catalog::handle(self, command).await,
            Command::Book(command) => views::detail::handle(self, command).await,
            Command::Authors => views::authors::handle(self).await,
            Command::Cart(command) => views::cart::handle(self, command).await,
            Command::Orders => views::orders::handle(self).await,
            Command::Account(command) => views::account::handle(self, command).await,
        }
    }
}

impl<S> Storefront<S> {
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart<S> {
        &self.cart
    }
}
