//! Account schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{UserId, UserRole};

/// The authenticated user as returned by `/login/`, `/register/` and `/users/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Email address, may be empty.
    #[serde(default)]
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Account role.
    #[serde(default)]
    pub role: UserRole,
    /// Registration timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Full name when known, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Body of `POST /login/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plain-text password, sent over the wire only.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /register/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Chosen password.
    pub password: String,
    /// Repeated password; must equal `password`.
    pub password_confirm: String,
}

impl Registration {
    /// Whether the password and its confirmation agree.
    #[must_use]
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirm
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"[REDACTED]")
            .field("password_confirm", &"[REDACTED]")
            .finish()
    }
}

/// Successful login or registration response.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: User,
    /// Short-lived bearer token.
    pub access: String,
    /// Refresh token; unused by this client.
    #[serde(default)]
    pub refresh: Option<String>,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user", &self.user)
            .field("access", &"[REDACTED]")
            .field("refresh", &self.refresh.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_decodes() {
        let json = r#"{
            "user": {"id": 1, "username": "anna", "email": "anna@example.com",
                     "first_name": "Anna", "last_name": "Karenina", "role": "user",
                     "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"},
            "refresh": "r-token",
            "access": "a-token"
        }"#;
        let auth: AuthResponse = serde_json::from_str(json).expect("auth");
        assert_eq!(auth.access, "a-token");
        assert_eq!(auth.user.display_name(), "Anna Karenina");
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let registration = Registration {
            username: "anna".to_string(),
            email: "anna@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password: "hunter2hunter2".to_string(),
            password_confirm: "hunter2hunter2".to_string(),
        };
        let debug_output = format!("{registration:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
        assert!(registration.passwords_match());
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user: User = serde_json::from_str(r#"{"id": 1, "username": "anna"}"#).expect("user");
        assert_eq!(user.display_name(), "anna");
    }
}
