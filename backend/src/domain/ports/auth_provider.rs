//! Port for the managed authentication provider.

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthAccount, AuthSession, Credentials, NewPassword, Registration};

use super::BackendError;

/// Identity operations delegated to the hosted auth service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account, storing the display name and default role as
    /// user metadata.
    async fn sign_up(&self, registration: &Registration) -> Result<AuthAccount, BackendError>;

    /// Exchange email and password for a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, BackendError>;

    /// Revoke the session behind `token`.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError>;

    /// Resolve the account owning `token`.
    ///
    /// Returns [`BackendError::Unauthorized`] for unknown or expired tokens.
    async fn current_user(&self, token: &AccessToken) -> Result<AuthAccount, BackendError>;

    /// Send a recovery email linking back to `redirect_to`.
    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: Option<String>,
    ) -> Result<(), BackendError>;

    /// Replace the password of the account owning `token`.
    async fn update_password(
        &self,
        token: &AccessToken,
        password: &NewPassword,
    ) -> Result<(), BackendError>;
}
