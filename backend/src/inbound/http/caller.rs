//! Extractors resolving the caller from a bearer token.
//!
//! The token comes from the `Authorization: Bearer` header, falling back to
//! the one stored in the session cookie at login. Every protected request
//! verifies it with the auth provider.

use actix_session::SessionExt;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{AccessToken, Caller, Error, ErrorCode, NOT_AUTHENTICATED};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Token presented with the request, if any.
pub fn presented_token(req: &HttpRequest) -> Option<AccessToken> {
    bearer_header(req).or_else(|| SessionContext::new(req.get_session()).token())
}

fn bearer_header(req: &HttpRequest) -> Option<AccessToken> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        AccessToken::new(token)
    } else {
        None
    }
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

/// The raw token presented with the request, unverified.
pub struct PresentedToken(pub Option<AccessToken>);

impl FromRequest for PresentedToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(presented_token(req))))
    }
}

/// A verified caller. Rejects the request with 401 otherwise.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use roamwise::inbound::http::caller::Authenticated;
///
/// async fn whoami(Authenticated(caller): Authenticated) -> HttpResponse {
///     HttpResponse::Ok().body(caller.id().to_string())
/// }
/// ```
pub struct Authenticated(pub Caller);

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = http_state(req);
        let token = presented_token(req);
        Box::pin(async move {
            let state = state?;
            let token = token.ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))?;
            state.auth.authenticate(token).await.map(Self)
        })
    }
}

/// A caller when a valid token is presented, anonymous otherwise.
///
/// Unknown or expired tokens downgrade to anonymous; provider outages still
/// fail the request.
pub struct MaybeAuthenticated(pub Option<Caller>);

impl FromRequest for MaybeAuthenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = http_state(req);
        let token = presented_token(req);
        Box::pin(async move {
            let state = state?;
            let Some(token) = token else {
                return Ok(Self(None));
            };
            match state.auth.authenticate(token).await {
                Ok(caller) => Ok(Self(Some(caller))),
                Err(err) if err.code() == ErrorCode::Unauthorized => {
                    debug!("stale token treated as anonymous");
                    Ok(Self(None))
                }
                Err(err) => Err(err),
            }
        })
    }
}
