//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie session stores the provider-issued access token after login so
//! browser clients need not attach an `Authorization` header themselves.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AccessToken, Error};

pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the caller's access token in the session cookie.
    pub fn persist_token(&self, token: &AccessToken) -> Result<(), Error> {
        self.0
            .insert(ACCESS_TOKEN_KEY, token.expose())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the stored access token, if present.
    ///
    /// Unreadable session state is treated as absent.
    pub fn token(&self) -> Option<AccessToken> {
        match self.0.get::<String>(ACCESS_TOKEN_KEY) {
            Ok(raw) => raw.and_then(AccessToken::new),
            Err(error) => {
                warn!(%error, "unreadable session cookie ignored");
                None
            }
        }
    }

    /// Drop all session state and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
