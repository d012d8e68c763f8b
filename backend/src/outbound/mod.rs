//! Outbound adapters implementing the domain's driven ports.
//!
//! Two interchangeable backends implement every port:
//!
//! - **supabase**: HTTP adapter for the hosted auth service and relational
//!   store
//! - **memory**: in-process tables for offline mode and tests
//!
//! Adapters are thin translators between domain types and the backend's
//! wire representation. They contain no business logic.

pub mod memory;
pub mod supabase;
