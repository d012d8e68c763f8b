//! Account lifecycle: registration, sign-in, token verification and
//! password recovery.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{AuthProvider, BackendError, UserRepository};
use crate::domain::{
    AccessScope, AccessToken, AccountProfile, AuthAccount, AuthSession, Caller, Credentials,
    Error, NewPassword, NewProfile, Registration,
};

/// Message returned whenever a token is missing, unknown or expired.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Service behind the `/api/auth` routes and the authentication extractor.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    /// Create a service over the given provider and profile store.
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            users,
            clock,
        }
    }

    /// Create an account and its profile row.
    ///
    /// Provider rejections (such as a duplicate email) surface as
    /// `invalid_request` with the provider's own message.
    pub async fn register(&self, registration: &Registration) -> Result<AuthAccount, Error> {
        let account = self
            .provider
            .sign_up(registration)
            .await
            .map_err(|err| match err {
                BackendError::Rejected { message } | BackendError::Unauthorized { message } => {
                    Error::invalid_request(message)
                }
                other => other.into_internal("Failed to register user"),
            })?;

        let profile = NewProfile {
            id: account.id,
            email: account.email.clone(),
            name: registration.name().to_owned(),
            created_at: self.clock.utc(),
        };
        self.users
            .insert_profile(&AccessScope::Anonymous, &profile)
            .await
            .map_err(|err| err.into_internal("Failed to register user"))?;

        info!(user_id = %account.id, "registered new account");
        Ok(AuthAccount {
            name: Some(profile.name),
            ..account
        })
    }

    /// Exchange credentials for a session.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, Error> {
        self.provider
            .sign_in(credentials)
            .await
            .map_err(|err| match err {
                BackendError::Rejected { .. } | BackendError::Unauthorized { .. } => {
                    Error::unauthorized("Invalid credentials")
                }
                other => other.into_internal("Failed to login"),
            })
    }

    /// Revoke the presented token, if any.
    pub async fn logout(&self, token: Option<&AccessToken>) -> Result<(), Error> {
        let Some(token) = token else {
            return Ok(());
        };
        self.provider
            .sign_out(token)
            .await
            .map_err(|err| err.into_internal("Failed to logout"))
    }

    /// Verify a token with the provider and resolve the caller.
    pub async fn authenticate(&self, token: AccessToken) -> Result<Caller, Error> {
        match self.provider.current_user(&token).await {
            Ok(account) => Ok(Caller::new(account, token)),
            Err(BackendError::Unauthorized { .. } | BackendError::Rejected { .. }) => {
                Err(Error::unauthorized(NOT_AUTHENTICATED))
            }
            Err(other) => Err(other.into_internal("Authentication failed")),
        }
    }

    /// The caller's profile row plus their role.
    pub async fn me(&self, caller: &Caller) -> Result<AccountProfile, Error> {
        let profile = self
            .users
            .find_profile(&caller.scope(), caller.id())
            .await
            .map_err(|err| err.into_internal("Failed to fetch user profile"))?
            .ok_or_else(|| Error::not_found("User not found"))?;
        Ok(AccountProfile {
            profile,
            role: caller.role(),
        })
    }

    /// Ask the provider to email a recovery link.
    pub async fn forgot_password(
        &self,
        email: &str,
        redirect_to: Option<String>,
    ) -> Result<(), Error> {
        self.provider
            .send_password_reset(email, redirect_to)
            .await
            .map_err(|err| err.into_internal("Failed to send password reset email"))
    }

    /// Replace the caller's password using their recovery session.
    pub async fn reset_password(&self, caller: &Caller, password: &NewPassword) -> Result<(), Error> {
        self.provider
            .update_password(caller.token(), password)
            .await
            .map_err(|err| err.into_internal("Failed to update password"))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
