//! Builders turning the configured backend into handler state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use roamwise::inbound::http::state::{HttpState, HttpStatePorts};
use roamwise::outbound::memory::InMemoryBackend;
use roamwise::outbound::supabase::SupabaseBackend;
use roamwise::settings::BackendChoice;

/// Build the handler state over the chosen backend adapter.
///
/// # Errors
/// Returns [`std::io::Error`] when the hosted backend's HTTP client cannot be
/// constructed.
pub(crate) fn build_http_state(backend: BackendChoice) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match backend {
        BackendChoice::Memory => {
            info!("serving from the seeded in-memory backend");
            HttpStatePorts::from_backend(Arc::new(InMemoryBackend::seeded(clock.clone())))
        }
        BackendChoice::Supabase(config) => {
            info!(url = %config.url, "serving from the hosted backend");
            let backend = SupabaseBackend::new(config).map_err(|err| {
                std::io::Error::other(format!("backend adapter setup failed: {err}"))
            })?;
            HttpStatePorts::from_backend(Arc::new(backend))
        }
    };
    Ok(web::Data::new(HttpState::new(ports, clock)))
}
