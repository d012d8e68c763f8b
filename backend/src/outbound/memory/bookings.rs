//! `bookings` and `booking_types` tables.

use async_trait::async_trait;
use uuid::Uuid;

use super::{InMemoryBackend, Tables};
use crate::domain::ports::{BackendError, BookingRepository};
use crate::domain::{
    AccessScope, Booking, BookingChanges, BookingFilter, BookingType, BookingView,
    DestinationRef, NewBooking, Page, PageRequest, TripWithDestination, UserId,
};

impl Tables {
    fn booking_view(&self, booking: &Booking) -> BookingView {
        BookingView {
            booking: booking.clone(),
            booking_types: self.booking_type(booking.type_id).cloned(),
            trips: self
                .trips
                .iter()
                .find(|trip| trip.id == booking.trip_id)
                .map(|trip| TripWithDestination {
                    trip: trip.clone(),
                    destinations: self
                        .destination(trip.destination_id)
                        .map(DestinationRef::from),
                }),
            activities: booking
                .activity_id
                .and_then(|id| self.activity(id))
                .map(|activity| self.activity_with_type(activity)),
        }
    }

    fn check_booking_refs(&self, trip_id: Uuid, type_id: Uuid) -> Result<(), BackendError> {
        if !self.trips.iter().any(|trip| trip.id == trip_id) {
            return Err(BackendError::rejected(
                "insert or update on table \"bookings\" violates foreign key constraint \"bookings_trip_id_fkey\"",
            ));
        }
        if self.booking_type(type_id).is_none() {
            return Err(BackendError::rejected(
                "insert or update on table \"bookings\" violates foreign key constraint \"bookings_type_id_fkey\"",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryBackend {
    async fn list(
        &self,
        _scope: &AccessScope,
        owner: &UserId,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, BackendError> {
        let tables = self.lock()?;
        let mut rows: Vec<&Booking> = tables
            .bookings
            .iter()
            .filter(|booking| &booking.user_id == owner && filter.matches(booking))
            .collect();
        rows.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        let views = rows
            .into_iter()
            .map(|booking| tables.booking_view(booking))
            .collect();
        Ok(Page::from_all(views, page))
    }

    async fn types(&self, _scope: &AccessScope) -> Result<Vec<BookingType>, BackendError> {
        let mut types = self.lock()?.booking_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn find_view(
        &self,
        _scope: &AccessScope,
        id: Uuid,
        owner: &UserId,
    ) -> Result<Option<BookingView>, BackendError> {
        let tables = self.lock()?;
        Ok(tables
            .bookings
            .iter()
            .find(|booking| booking.id == id && &booking.user_id == owner)
            .map(|booking| tables.booking_view(booking)))
    }

    async fn find_owned(
        &self,
        _scope: &AccessScope,
        id: Uuid,
        owner: &UserId,
    ) -> Result<Option<Booking>, BackendError> {
        Ok(self
            .lock()?
            .bookings
            .iter()
            .find(|booking| booking.id == id && &booking.user_id == owner)
            .cloned())
    }

    async fn insert(
        &self,
        _scope: &AccessScope,
        booking: &NewBooking,
    ) -> Result<Booking, BackendError> {
        let mut tables = self.lock()?;
        tables.check_booking_refs(booking.trip_id, booking.type_id)?;
        let row = Booking {
            id: Uuid::new_v4(),
            user_id: booking.user_id,
            trip_id: booking.trip_id,
            type_id: booking.type_id,
            activity_id: booking.activity_id,
            provider_name: booking.provider_name.clone(),
            booking_reference: booking.booking_reference.clone(),
            booking_date: booking.booking_date,
            start_date: booking.start_date,
            end_date: booking.end_date,
            amount: booking.amount,
            currency: booking.currency.clone(),
            status: booking.status.clone(),
            notes: booking.notes.clone(),
            created_at: booking.created_at,
            updated_at: None,
        };
        tables.bookings.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        _scope: &AccessScope,
        id: Uuid,
        changes: &BookingChanges,
    ) -> Result<Option<Booking>, BackendError> {
        let mut tables = self.lock()?;
        let Some(mut updated) = tables
            .bookings
            .iter()
            .find(|booking| booking.id == id)
            .cloned()
        else {
            return Ok(None);
        };
        changes.apply_to(&mut updated);
        tables.check_booking_refs(updated.trip_id, updated.type_id)?;
        if let Some(row) = tables.bookings.iter_mut().find(|booking| booking.id == id) {
            *row = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete(&self, _scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        self.lock()?.bookings.retain(|booking| booking.id != id);
        Ok(())
    }
}
