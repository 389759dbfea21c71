//! Account endpoints.

use bookshelf_core::{AuthResponse, Credentials, Page, Registration, User};
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiClient, ApiError, ApiRequest};

impl ApiClient {
    /// `POST /login/`, sent without a bearer even when a token is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for bad credentials.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = ApiRequest::post("/login/", credentials)?;
        self.fetch(&request, None).await
    }

    /// `POST /register/`, sent without a bearer even when a token is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the field errors when the backend
    /// refuses the profile.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let request = ApiRequest::post("/register/", registration)?;
        self.fetch(&request, None).await
    }

    /// `GET /users/` (authenticated); the backend scopes the list to the
    /// caller, so the first result is the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a page of users.
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: Option<&SecretString>) -> Result<Option<User>, ApiError> {
        let request = ApiRequest::get("/users/").authenticated();
        let page: Page<User> = self.fetch(&request, token).await?;
        Ok(page.results.into_iter().next())
    }
}
