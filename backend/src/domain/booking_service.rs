//! Bookings attached to the caller's trips.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{BackendError, BookingRepository, TripRepository};
use crate::domain::{
    Booking, BookingChanges, BookingFilter, BookingType, BookingView, Caller,
    DEFAULT_BOOKING_STATUS, DEFAULT_CURRENCY, Error, NewBooking, Page, PageRequest,
};

const NOT_OWNED: &str = "Booking not found or access denied";

/// Caller-supplied fields for a new booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    /// Trip, which the caller must own.
    pub trip_id: Uuid,
    /// Category.
    pub type_id: Uuid,
    /// When booked.
    pub booking_date: DateTime<Utc>,
    /// Amount.
    pub amount: f64,
    /// Booked activity.
    pub activity_id: Option<Uuid>,
    /// Provider.
    pub provider_name: Option<String>,
    /// Confirmation code.
    pub booking_reference: Option<String>,
    /// Service start.
    pub start_date: Option<DateTime<Utc>>,
    /// Service end.
    pub end_date: Option<DateTime<Utc>>,
    /// Currency, `USD` when omitted.
    pub currency: Option<String>,
    /// Status, `confirmed` when omitted.
    pub status: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// Service behind the `/api/bookings` routes.
#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    trips: Arc<dyn TripRepository>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    /// Create a service over the given repositories.
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        trips: Arc<dyn TripRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            trips,
            clock,
        }
    }

    /// The caller's bookings, latest booking date first.
    pub async fn list(
        &self,
        caller: &Caller,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, Error> {
        self.bookings
            .list(&caller.scope(), caller.id(), filter, page)
            .await
            .map_err(|err| err.into_internal("Failed to fetch bookings"))
    }

    /// Every booking type.
    pub async fn types(&self, caller: &Caller) -> Result<Vec<BookingType>, Error> {
        self.bookings
            .types(&caller.scope())
            .await
            .map_err(|err| err.into_internal("Failed to fetch booking types"))
    }

    /// One of the caller's bookings with its embeds.
    pub async fn detail(&self, caller: &Caller, id: Uuid) -> Result<BookingView, Error> {
        self.bookings
            .find_view(&caller.scope(), id, caller.id())
            .await
            .map_err(|err| err.into_internal("Failed to fetch booking"))?
            .ok_or_else(|| Error::not_found(NOT_OWNED))
    }

    /// Book against one of the caller's trips.
    pub async fn create(&self, caller: &Caller, draft: BookingDraft) -> Result<Booking, Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to create booking");

        if self
            .trips
            .find_owned(&scope, draft.trip_id, caller.id())
            .await
            .map_err(failed)?
            .is_none()
        {
            return Err(Error::not_found("Trip not found or access denied"));
        }

        let booking = NewBooking {
            user_id: *caller.id(),
            trip_id: draft.trip_id,
            type_id: draft.type_id,
            activity_id: draft.activity_id,
            provider_name: draft.provider_name,
            booking_reference: draft.booking_reference,
            booking_date: draft.booking_date,
            start_date: draft.start_date,
            end_date: draft.end_date,
            amount: draft.amount,
            currency: non_blank_or(draft.currency, DEFAULT_CURRENCY),
            status: non_blank_or(draft.status, DEFAULT_BOOKING_STATUS),
            notes: draft.notes,
            created_at: self.clock.utc(),
        };
        self.bookings
            .insert(&scope, &booking)
            .await
            .map_err(failed)
    }

    /// Apply a partial update to one of the caller's bookings.
    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        changes: BookingChanges,
    ) -> Result<Booking, Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to update booking");
        self.bookings
            .find_owned(&scope, id, caller.id())
            .await
            .map_err(failed)?
            .ok_or_else(|| Error::not_found(NOT_OWNED))?;

        let changes = BookingChanges {
            currency: changes.currency.filter(|value| !value.trim().is_empty()),
            status: changes.status.filter(|value| !value.trim().is_empty()),
            updated_at: Some(self.clock.utc()),
            ..changes
        };
        self.bookings
            .update(&scope, id, &changes)
            .await
            .map_err(failed)?
            .ok_or_else(|| Error::not_found(NOT_OWNED))
    }

    /// Delete one of the caller's bookings.
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to delete booking");
        self.bookings
            .find_owned(&scope, id, caller.id())
            .await
            .map_err(failed)?
            .ok_or_else(|| Error::not_found(NOT_OWNED))?;
        self.bookings.delete(&scope, id).await.map_err(failed)
    }
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}
