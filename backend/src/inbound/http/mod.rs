//! HTTP inbound adapter exposing REST endpoints.
//!
//! One module per resource under `/api`, each exposing a `scope()` that the
//! server mounts. Shared pieces (caller extraction, session access, error
//! mapping, validation) live alongside them.

pub mod activities;
pub mod auth;
pub mod bookings;
pub mod caller;
pub mod comments;
pub mod destinations;
pub mod error;
pub mod health;
pub mod posts;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trips;
pub mod users;
pub mod validation;

pub use error::ApiResult;
