//! Account and token handling for the in-memory backend.

use async_trait::async_trait;
use chrono::Duration;
use tracing::info;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{InMemoryBackend, StoredAccount};
use crate::domain::ports::{AuthProvider, BackendError};
use crate::domain::{
    AccessToken, AuthAccount, AuthSession, Credentials, NewPassword, Registration, UserId,
    UserRole,
};

#[async_trait]
impl AuthProvider for InMemoryBackend {
    async fn sign_up(&self, registration: &Registration) -> Result<AuthAccount, BackendError> {
        let credentials = registration.credentials();
        let mut tables = self.lock()?;
        if tables
            .accounts
            .iter()
            .any(|stored| stored.account.email.eq_ignore_ascii_case(credentials.email()))
        {
            return Err(BackendError::rejected("User already registered"));
        }
        let account = AuthAccount {
            id: UserId::random(),
            email: credentials.email().to_owned(),
            name: Some(registration.name().to_owned()),
            role: UserRole::Traveler,
        };
        tables.accounts.push(StoredAccount {
            account: account.clone(),
            password: Zeroizing::new(credentials.password().to_owned()),
        });
        Ok(account)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, BackendError> {
        let mut tables = self.lock()?;
        let account = tables
            .accounts
            .iter()
            .find(|stored| {
                stored.account.email.eq_ignore_ascii_case(credentials.email())
                    && stored.password.as_str() == credentials.password()
            })
            .map(|stored| stored.account.clone())
            .ok_or_else(|| BackendError::rejected("Invalid login credentials"))?;

        let raw = Uuid::new_v4().simple().to_string();
        let access_token = AccessToken::new(raw.clone())
            .ok_or_else(|| BackendError::decode("issued an empty access token"))?;
        tables.sessions.insert(raw, account.id);

        let ttl = Duration::hours(1);
        let expires_at = self.clock.utc() + ttl;
        Ok(AuthSession {
            access_token,
            refresh_token: Some(Uuid::new_v4().simple().to_string()),
            token_type: "bearer".to_owned(),
            expires_in: u64::try_from(ttl.num_seconds()).ok(),
            expires_at: Some(expires_at.timestamp()),
            account,
        })
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError> {
        self.lock()?.sessions.remove(token.expose());
        Ok(())
    }

    async fn current_user(&self, token: &AccessToken) -> Result<AuthAccount, BackendError> {
        let tables = self.lock()?;
        let user_id = tables
            .sessions
            .get(token.expose())
            .ok_or_else(|| BackendError::unauthorized("invalid JWT"))?;
        tables
            .accounts
            .iter()
            .find(|stored| &stored.account.id == user_id)
            .map(|stored| stored.account.clone())
            .ok_or_else(|| BackendError::unauthorized("user from token no longer exists"))
    }

    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: Option<String>,
    ) -> Result<(), BackendError> {
        // Unknown addresses succeed silently.
        info!(
            email,
            redirect_to = redirect_to.as_deref().unwrap_or_default(),
            "password reset requested"
        );
        Ok(())
    }

    async fn update_password(
        &self,
        token: &AccessToken,
        password: &NewPassword,
    ) -> Result<(), BackendError> {
        let mut tables = self.lock()?;
        let user_id = *tables
            .sessions
            .get(token.expose())
            .ok_or_else(|| BackendError::unauthorized("invalid JWT"))?;
        let stored = tables
            .accounts
            .iter_mut()
            .find(|stored| stored.account.id == user_id)
            .ok_or_else(|| BackendError::unauthorized("user from token no longer exists"))?;
        stored.password = Zeroizing::new(password.expose().to_owned());
        Ok(())
    }
}
