//! Trip planning: create, list, inspect, edit and delete trips.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::TripRepository;
use crate::domain::{Caller, Error, NewTrip, Trip, TripChanges, TripDetail, TripListing};

const NOT_OWNED: &str = "Trip not found or access denied";

/// Caller-supplied fields for a new trip, before defaults apply.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    /// Destination.
    pub destination_id: Uuid,
    /// Departure.
    pub start_date: DateTime<Utc>,
    /// Return.
    pub end_date: DateTime<Utc>,
    /// Planned spend.
    pub budget: Option<f64>,
    /// Notes.
    pub notes: Option<String>,
    /// Visibility.
    pub is_public: Option<bool>,
}

/// Service behind the `/api/trips` routes.
#[derive(Clone)]
pub struct TripService {
    trips: Arc<dyn TripRepository>,
    clock: Arc<dyn Clock>,
}

impl TripService {
    /// Create a service over the given repository.
    pub fn new(trips: Arc<dyn TripRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { trips, clock }
    }

    /// Create a trip owned by the caller.
    ///
    /// Missing optional fields default to a zero budget, empty notes and a
    /// private trip.
    pub async fn create(&self, caller: &Caller, draft: TripDraft) -> Result<Trip, Error> {
        let trip = NewTrip {
            user_id: *caller.id(),
            destination_id: draft.destination_id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            budget: draft.budget.unwrap_or(0.0),
            notes: draft.notes.unwrap_or_default(),
            is_public: draft.is_public.unwrap_or(false),
            created_at: self.clock.utc(),
        };
        self.trips
            .insert(&caller.scope(), &trip)
            .await
            .map_err(|err| err.into_internal("Failed to create trip"))
    }

    /// Trips the caller owns or that are public.
    pub async fn list(&self, caller: &Caller) -> Result<Vec<TripListing>, Error> {
        self.trips
            .list_visible(&caller.scope(), caller.id())
            .await
            .map_err(|err| err.into_internal("Failed to fetch trips"))
    }

    /// A visible trip with its embeds.
    pub async fn detail(&self, caller: &Caller, id: Uuid) -> Result<TripDetail, Error> {
        self.trips
            .find_visible_detail(&caller.scope(), id, caller.id())
            .await
            .map_err(|err| err.into_internal("Failed to fetch trip"))?
            .ok_or_else(|| Error::not_found("Trip not found"))
    }

    /// Apply a partial update to a trip the caller owns.
    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        changes: TripChanges,
    ) -> Result<Trip, Error> {
        let scope = caller.scope();
        self.require_owned(caller, id, "Failed to update trip").await?;
        let changes = TripChanges {
            updated_at: Some(self.clock.utc()),
            ..changes
        };
        self.trips
            .update(&scope, id, &changes)
            .await
            .map_err(|err| err.into_internal("Failed to update trip"))?
            .ok_or_else(|| Error::not_found(NOT_OWNED))
    }

    /// Delete a trip the caller owns.
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), Error> {
        self.require_owned(caller, id, "Failed to delete trip").await?;
        self.trips
            .delete(&caller.scope(), id)
            .await
            .map_err(|err| err.into_internal("Failed to delete trip"))
    }

    async fn require_owned(
        &self,
        caller: &Caller,
        id: Uuid,
        failure: &'static str,
    ) -> Result<Trip, Error> {
        self.trips
            .find_owned(&caller.scope(), id, caller.id())
            .await
            .map_err(|err| err.into_internal(failure))?
            .ok_or_else(|| Error::not_found(NOT_OWNED))
    }
}
