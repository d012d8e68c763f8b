//! Hosted backend adapter.
//!
//! Speaks HTTP to a Supabase-style project: GoTrue under `/auth/v1` for
//! identity and PostgREST under `/rest/v1` for table access. The adapter
//! owns transport details only: headers, filters, response decoding and
//! status mapping. Row-level policies are enforced upstream by forwarding
//! the caller's bearer token.

mod activities;
mod auth;
mod bookings;
mod client;
mod comments;
mod destinations;
mod dto;
mod posts;
mod query;
mod trips;
mod users;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use zeroize::Zeroizing;

use client::SupabaseClient;

/// Connection settings for the hosted project.
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: Url,
    /// Public anonymous key sent as `apikey` on every request.
    pub anon_key: Zeroizing<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Failure while building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseSetupError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The project URL cannot serve as a base for API paths.
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Backend adapter implementing every driven port against the hosted
/// project.
///
/// Cloning shares one connection pool.
#[derive(Clone)]
pub struct SupabaseBackend {
    client: Arc<SupabaseClient>,
}

impl SupabaseBackend {
    /// Build the adapter with one pooled reqwest client.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseSetupError`] when the client cannot be built or
    /// the project URL cannot be joined with API paths.
    pub fn new(config: SupabaseConfig) -> Result<Self, SupabaseSetupError> {
        Ok(Self {
            client: Arc::new(SupabaseClient::new(config)?),
        })
    }
}
