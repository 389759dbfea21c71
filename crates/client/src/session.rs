//! Session store.
//!
//! Holds the bearer token and the current user. The token is persisted under
//! [`keys::TOKEN`] as a plain string; the user lives only in memory and is
//! fetched again at startup by [`SessionStore::restore`].

use bookshelf_core::{AuthResponse, Credentials, Registration, User};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::error::{ActionError, clear_sentry_user, set_sentry_user};
use crate::storage::{DurableStore, StorageError, keys};

/// Authentication state and its durable token.
pub struct SessionStore<S> {
    store: S,
    token: Option<SecretString>,
    user: Option<User>,
}

impl<S> std::fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user.as_ref().map(|user| &user.username))
            .finish_non_exhaustive()
    }
}

impl<S> SessionStore<S> {
    /// The bearer token, if logged in.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// The current user, once known.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl<S: DurableStore> SessionStore<S> {
    /// Read the persisted token. The user stays unknown until [`Self::restore`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(store: S) -> Result<Self, StorageError> {
        let token = store
            .read(keys::TOKEN)?
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(SecretString::from);

        Ok(Self {
            store,
            token,
            user: None,
        })
    }

    /// Log in and keep the returned token.
    ///
    /// # Errors
    ///
    /// Returns the server's reason on rejection, or a storage error if the
    /// token could not be persisted.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(&mut self, api: &ApiClient, credentials: &Credentials) -> Result<&User, ActionError> {
        let auth = api
            .login(credentials)
            .await
            .map_err(|err| ActionError::from_api(err, "Login failed", "Invalid username or password"))?;
        self.establish(auth)
    }

    /// Create an account and keep the returned token.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the passwords differ (no request is
    /// made), otherwise the same errors as [`Self::login`].
    #[instrument(skip_all, fields(username = %registration.username))]
    pub async fn register(
        &mut self,
        api: &ApiClient,
        registration: &Registration,
    ) -> Result<&User, ActionError> {
        if !registration.passwords_match() {
            return Err(ActionError::validation("Passwords do not match"));
        }

        let auth = api
            .register(registration)
            .await
            .map_err(|err| ActionError::from_api(err, "Registration failed", "Could not create the account"))?;
        self.establish(auth)
    }

    fn establish(&mut self, auth: AuthResponse) -> Result<&User, ActionError> {
        self.store.write(keys::TOKEN, &auth.access)?;
        self.token = Some(SecretString::from(auth.access));

        set_sentry_user(&auth.user.id, &auth.user.username);
        info!(user_id = %auth.user.id, "session established");
        Ok(self.user.insert(auth.user))
    }

    /// Forget the session. Memory is cleared even if the durable token
    /// cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable token could not be removed.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.token = None;
        self.user = None;
        clear_sentry_user();
        self.store.remove(keys::TOKEN)
    }

    /// Re-derive the user from a persisted token.
    ///
    /// Any failure, including an empty user list, logs out.
    ///
    /// # Errors
    ///
    /// Returns an error only if logging out could not remove the token.
    #[instrument(skip_all)]
    pub async fn restore(&mut self, api: &ApiClient) -> Result<Option<&User>, StorageError> {
        let Some(token) = self.token.as_ref() else {
            return Ok(None);
        };

        let result = api.current_user(Some(token)).await;
        match result {
            Ok(Some(user)) => {
                set_sentry_user(&user.id, &user.username);
                Ok(Some(self.user.insert(user)))
            }
            Ok(None) => {
                warn!("token accepted but no user was returned, logging out");
                self.logout()?;
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "stored session could not be restored, logging out");
                self.logout()?;
                Ok(None)
            }
        }
    }
}
