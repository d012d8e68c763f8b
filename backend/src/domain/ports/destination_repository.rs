//! Port for the `destinations` table.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AccessScope, Destination, DestinationDetail, DestinationFilter, NewDestination, Page,
    PageRequest,
};

use super::BackendError;

/// Destination catalogue reads and inserts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DestinationRepository: Send + Sync {
    /// Filtered, paginated listing with an exact total.
    async fn list(
        &self,
        scope: &AccessScope,
        filter: &DestinationFilter,
        page: PageRequest,
    ) -> Result<Page<Destination>, BackendError>;

    /// The `limit` destinations with most trips.
    async fn popular(
        &self,
        scope: &AccessScope,
        limit: u32,
    ) -> Result<Vec<Destination>, BackendError>;

    /// Case-insensitive substring search over name and country.
    async fn search(
        &self,
        scope: &AccessScope,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Destination>, BackendError>;

    /// A destination with its activities and trips.
    async fn find_detail(
        &self,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<DestinationDetail>, BackendError>;

    /// Insert a destination and return the stored row.
    async fn insert(
        &self,
        scope: &AccessScope,
        destination: &NewDestination,
    ) -> Result<Destination, BackendError>;
}
