//! Port for the `trips` table and its embeds.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AccessScope, NewTrip, Trip, TripChanges, TripDetail, TripListing, UserId};

use super::BackendError;

/// Trip persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Insert a trip and return the stored row.
    async fn insert(&self, scope: &AccessScope, trip: &NewTrip) -> Result<Trip, BackendError>;

    /// Trips owned by `viewer` or public, by `start_date` ascending.
    async fn list_visible(
        &self,
        scope: &AccessScope,
        viewer: &UserId,
    ) -> Result<Vec<TripListing>, BackendError>;

    /// A trip visible to `viewer` with all embeds.
    async fn find_visible_detail(
        &self,
        scope: &AccessScope,
        id: Uuid,
        viewer: &UserId,
    ) -> Result<Option<TripDetail>, BackendError>;

    /// A trip only when `owner` owns it.
    async fn find_owned(
        &self,
        scope: &AccessScope,
        id: Uuid,
        owner: &UserId,
    ) -> Result<Option<Trip>, BackendError>;

    /// Apply a partial update. Returns `None` when no row matched.
    async fn update(
        &self,
        scope: &AccessScope,
        id: Uuid,
        changes: &TripChanges,
    ) -> Result<Option<Trip>, BackendError>;

    /// Delete a trip.
    async fn delete(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError>;

    /// Every trip owned by `owner`, by `start_date` ascending.
    async fn list_by_owner(
        &self,
        scope: &AccessScope,
        owner: &UserId,
    ) -> Result<Vec<Trip>, BackendError>;
}
