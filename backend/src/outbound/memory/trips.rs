//! `trips` table with destination, owner, booking and activity embeds.

use async_trait::async_trait;
use uuid::Uuid;

use super::InMemoryBackend;
use crate::domain::ports::{BackendError, TripRepository};
use crate::domain::{
    AccessScope, Destination, NewTrip, Trip, TripChanges, TripDetail, TripListing, UserId,
};

#[async_trait]
impl TripRepository for InMemoryBackend {
    async fn insert(&self, _scope: &AccessScope, trip: &NewTrip) -> Result<Trip, BackendError> {
        let mut tables = self.lock()?;
        if tables.destination(trip.destination_id).is_none() {
            return Err(BackendError::rejected(
                "insert or update on table \"trips\" violates foreign key constraint \"trips_destination_id_fkey\"",
            ));
        }
        let row = Trip {
            id: Uuid::new_v4(),
            user_id: trip.user_id,
            destination_id: trip.destination_id,
            start_date: trip.start_date,
            end_date: trip.end_date,
            budget: Some(trip.budget),
            notes: Some(trip.notes.clone()),
            is_public: trip.is_public,
            created_at: trip.created_at,
            updated_at: None,
        };
        tables.trips.push(row.clone());
        Ok(row)
    }

    async fn list_visible(
        &self,
        _scope: &AccessScope,
        viewer: &UserId,
    ) -> Result<Vec<TripListing>, BackendError> {
        let tables = self.lock()?;
        let mut trips: Vec<&Trip> = tables
            .trips
            .iter()
            .filter(|trip| trip.visible_to(viewer))
            .collect();
        trips.sort_by_key(|trip| trip.start_date);
        Ok(trips
            .into_iter()
            .map(|trip| TripListing {
                trip: trip.clone(),
                destinations: tables
                    .destination(trip.destination_id)
                    .map(Destination::summary),
                users: tables.user_summary(&trip.user_id),
            })
            .collect())
    }

    async fn find_visible_detail(
        &self,
        _scope: &AccessScope,
        id: Uuid,
        viewer: &UserId,
    ) -> Result<Option<TripDetail>, BackendError> {
        let tables = self.lock()?;
        let Some(trip) = tables
            .trips
            .iter()
            .find(|trip| trip.id == id && trip.visible_to(viewer))
        else {
            return Ok(None);
        };

        let bookings: Vec<_> = tables
            .bookings
            .iter()
            .filter(|booking| booking.trip_id == id)
            .collect();
        let mut activity_ids: Vec<Uuid> = bookings
            .iter()
            .filter_map(|booking| booking.activity_id)
            .collect();
        activity_ids.sort_unstable();
        activity_ids.dedup();

        Ok(Some(TripDetail {
            trip: trip.clone(),
            destinations: tables.destination(trip.destination_id).cloned(),
            users: tables.user_summary(&trip.user_id),
            activities: activity_ids
                .into_iter()
                .filter_map(|activity_id| tables.activity(activity_id))
                .map(|activity| tables.activity_with_type(activity))
                .collect(),
            bookings: bookings
                .into_iter()
                .map(|booking| tables.booking_with_type(booking))
                .collect(),
        }))
    }

    async fn find_owned(
        &self,
        _scope: &AccessScope,
        id: Uuid,
        owner: &UserId,
    ) -> Result<Option<Trip>, BackendError> {
        Ok(self
            .lock()?
            .trips
            .iter()
            .find(|trip| trip.id == id && &trip.user_id == owner)
            .cloned())
    }

    async fn update(
        &self,
        _scope: &AccessScope,
        id: Uuid,
        changes: &TripChanges,
    ) -> Result<Option<Trip>, BackendError> {
        let mut tables = self.lock()?;
        if let Some(destination_id) = changes.destination_id {
            if tables.destination(destination_id).is_none() {
                return Err(BackendError::rejected(
                    "insert or update on table \"trips\" violates foreign key constraint \"trips_destination_id_fkey\"",
                ));
            }
        }
        Ok(tables
            .trips
            .iter_mut()
            .find(|trip| trip.id == id)
            .map(|trip| {
                changes.apply_to(trip);
                trip.clone()
            }))
    }

    async fn delete(&self, _scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        let mut tables = self.lock()?;
        tables.trips.retain(|trip| trip.id != id);
        tables.bookings.retain(|booking| booking.trip_id != id);
        Ok(())
    }

    async fn list_by_owner(
        &self,
        _scope: &AccessScope,
        owner: &UserId,
    ) -> Result<Vec<Trip>, BackendError> {
        let tables = self.lock()?;
        let mut trips: Vec<Trip> = tables
            .trips
            .iter()
            .filter(|trip| &trip.user_id == owner)
            .cloned()
            .collect();
        trips.sort_by_key(|trip| trip.start_date);
        Ok(trips)
    }
}
