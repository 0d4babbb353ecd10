//! Dashboard session and credential checks.
//!
//! A [`Session`] is an explicit value owned by the caller; there is no
//! process-wide "logged in" flag.

use crate::{AuthConfig, AuthError, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    email: Option<String>,
    authenticated_at: Option<Timestamp>,
}

impl Session {
    /// An anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate against the configured admin credentials.
    ///
    /// Email and password are compared exactly. A failed attempt leaves the
    /// session as it was.
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        auth: &AuthConfig,
    ) -> Result<(), AuthError> {
        if email != auth.admin_email || password != auth.admin_password {
            tracing::warn!(email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        self.email = Some(email.to_string());
        self.authenticated_at = Some(Utc::now());
        tracing::info!(email, "login succeeded");
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(email) = self.email.take() {
            tracing::info!(email = %email, "logout");
        }
        self.authenticated_at = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.email.is_some()
    }

    /// The authenticated email, or `NotAuthenticated`.
    pub fn require_authenticated(&self) -> Result<&str, AuthError> {
        self.email.as_deref().ok_or(AuthError::NotAuthenticated)
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn authenticated_at(&self) -> Option<Timestamp> {
        self.authenticated_at
    }

    /// Validate and apply a password change for the signed-in admin.
    pub fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
        auth: &mut AuthConfig,
    ) -> Result<(), AuthError> {
        let email = self.require_authenticated()?;
        validate_password_change(current, new, confirm, auth)?;
        auth.admin_password = new.to_string();
        tracing::info!(email, "password changed");
        Ok(())
    }
}

/// Check a password change request.
///
/// Checks run in order: current password present, current password correct,
/// new password long enough (in characters), confirmation equal.
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
    auth: &AuthConfig,
) -> Result<(), AuthError> {
    if current.is_empty() {
        return Err(AuthError::CurrentPasswordRequired);
    }
    if current != auth.admin_password {
        return Err(AuthError::CurrentPasswordIncorrect);
    }
    if new.chars().count() < auth.min_password_length {
        return Err(AuthError::PasswordTooShort {
            min: auth.min_password_length,
        });
    }
    if new != confirm {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}
