//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{App, web};
use serde_json::Value;

use crate::domain::test_fixtures::fixture_clock;
use crate::inbound::http::error::{json_config, path_config, query_config};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{DEMO_EMAIL, DEMO_PASSWORD, InMemoryBackend};

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set on a response, if any.
pub fn session_cookie(response: &ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Handler state over a freshly seeded in-memory backend.
pub fn memory_state() -> (web::Data<HttpState>, InMemoryBackend) {
    let backend = InMemoryBackend::seeded(fixture_clock());
    let ports = HttpStatePorts::from_backend(Arc::new(backend.clone()));
    (web::Data::new(HttpState::new(ports, fixture_clock())), backend)
}

/// App wired with session middleware, extractor configs and `state`.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .app_data(state)
        .app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
}

/// Sign in as the seeded demo traveller and return the bearer token.
pub async fn demo_token(state: &HttpState) -> String {
    sign_in(state, DEMO_EMAIL, DEMO_PASSWORD).await
}

/// Sign in with `email` and `password` and return the bearer token.
pub async fn sign_in(state: &HttpState, email: &str, password: &str) -> String {
    let credentials = crate::domain::Credentials::try_from_parts(email, password)
        .expect("valid test credentials");
    let session = state.auth.login(&credentials).await.expect("test login");
    session.access_token.expose().to_owned()
}

/// Resolve the caller behind `token`.
pub async fn caller_for(state: &HttpState, token: &str) -> crate::domain::Caller {
    let token = crate::domain::AccessToken::new(token).expect("non-blank token");
    state.auth.authenticate(token).await.expect("known token")
}

/// The first seeded destination, in listing order.
pub async fn seeded_destination(state: &HttpState) -> crate::domain::Destination {
    state
        .destinations
        .list(
            &crate::domain::DestinationFilter::default(),
            crate::domain::PageRequest::default(),
        )
        .await
        .expect("destinations listed")
        .data
        .into_iter()
        .next()
        .expect("seeded destination")
}

/// `Authorization` header value for `token`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Read the `error` message from an error envelope.
pub fn error_message(body: &Value) -> Option<&str> {
    body.get("error").and_then(Value::as_str)
}
