//! Roamwise travel API library.
//!
//! Hexagonal layout: [`domain`] holds entities, services and driven ports;
//! [`inbound`] adapts HTTP onto those services; [`outbound`] implements the
//! ports against the hosted backend or in-process tables.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
