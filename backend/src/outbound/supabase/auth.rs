//! GoTrue-backed [`AuthProvider`].

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use super::SupabaseBackend;
use super::dto::{GoTrueSessionDto, GoTrueUserDto, SignUpDto};
use crate::domain::ports::{AuthProvider, BackendError};
use crate::domain::{
    AccessToken, AuthAccount, AuthSession, Credentials, NewPassword, Registration, UserRole,
};

#[async_trait]
impl AuthProvider for SupabaseBackend {
    async fn sign_up(&self, registration: &Registration) -> Result<AuthAccount, BackendError> {
        let credentials = registration.credentials();
        let body = json!({
            "email": credentials.email(),
            "password": credentials.password(),
            "data": {
                "name": registration.name(),
                "role": UserRole::Traveler.as_str(),
            },
        });
        let request = self.client.auth(Method::POST, "signup", None)?.json(&body);
        let reply: SignUpDto = self.client.send(request).await?.decode()?;
        Ok(reply.into())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, BackendError> {
        let body = json!({
            "email": credentials.email(),
            "password": credentials.password(),
        });
        let request = self
            .client
            .auth(Method::POST, "token", None)?
            .query(&[("grant_type", "password")])
            .json(&body);
        let reply: GoTrueSessionDto = self.client.send(request).await?.decode()?;
        AuthSession::try_from(reply)
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError> {
        let request = self.client.auth(Method::POST, "logout", Some(token))?;
        self.client.send(request).await.map(drop)
    }

    async fn current_user(&self, token: &AccessToken) -> Result<AuthAccount, BackendError> {
        let request = self.client.auth(Method::GET, "user", Some(token))?;
        let user: GoTrueUserDto = self.client.send(request).await?.decode()?;
        Ok(user.into())
    }

    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: Option<String>,
    ) -> Result<(), BackendError> {
        let mut request = self
            .client
            .auth(Method::POST, "recover", None)?
            .json(&json!({ "email": email }));
        if let Some(target) = redirect_to {
            request = request.query(&[("redirect_to", target)]);
        }
        self.client.send(request).await.map(drop)
    }

    async fn update_password(
        &self,
        token: &AccessToken,
        password: &NewPassword,
    ) -> Result<(), BackendError> {
        let request = self
            .client
            .auth(Method::PUT, "user", Some(token))?
            .json(&json!({ "password": password.expose() }));
        self.client.send(request).await.map(drop)
    }
}
