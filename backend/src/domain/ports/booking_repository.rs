//! Port for `bookings` and `booking_types`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AccessScope, Booking, BookingChanges, BookingFilter, BookingType, BookingView, NewBooking,
    Page, PageRequest, UserId,
};

use super::BackendError;

/// Booking persistence, always scoped to the owning member.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// The owner's bookings, by `booking_date` descending.
    async fn list(
        &self,
        scope: &AccessScope,
        owner: &UserId,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, BackendError>;

    /// Every booking type, by name.
    async fn types(&self, scope: &AccessScope) -> Result<Vec<BookingType>, BackendError>;

    /// A booking with its embeds, only when `owner` owns it.
    async fn find_view(
        &self,
        scope: &AccessScope,
        id: Uuid,
        owner: &UserId,
    ) -> Result<Option<BookingView>, BackendError>;

    /// The bare row, only when `owner` owns it.
    async fn find_owned(
        &self,
        scope: &AccessScope,
        id: Uuid,
        owner: &UserId,
    ) -> Result<Option<Booking>, BackendError>;

    /// Insert a booking and return the stored row.
    async fn insert(
        &self,
        scope: &AccessScope,
        booking: &NewBooking,
    ) -> Result<Booking, BackendError>;

    /// Apply a partial update. Returns `None` when no row matched.
    async fn update(
        &self,
        scope: &AccessScope,
        id: Uuid,
        changes: &BookingChanges,
    ) -> Result<Option<Booking>, BackendError>;

    /// Delete a booking.
    async fn delete(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError>;
}
