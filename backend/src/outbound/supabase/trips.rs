//! `trips` over PostgREST.

use async_trait::async_trait;
use uuid::Uuid;

use super::SupabaseBackend;
use super::query::{Direction, Query};
use crate::domain::ports::{BackendError, TripRepository};
use crate::domain::{AccessScope, NewTrip, Trip, TripChanges, TripDetail, TripListing, UserId};

const TRIPS: &str = "trips";
const LISTING_SELECT: &str =
    "*, destinations(id,name,country,image_url), users(id,name,profile_picture)";
// Activities embed through `bookings`, which links trips to activities.
const DETAIL_SELECT: &str = "*, destinations(*), users(id,name,profile_picture), \
     bookings(*, booking_types(name,icon)), activities(*, activity_types(name,icon))";

#[async_trait]
impl TripRepository for SupabaseBackend {
    async fn insert(&self, scope: &AccessScope, trip: &NewTrip) -> Result<Trip, BackendError> {
        self.client.insert(scope, TRIPS, trip, "*").await
    }

    async fn list_visible(
        &self,
        scope: &AccessScope,
        viewer: &UserId,
    ) -> Result<Vec<TripListing>, BackendError> {
        let query = Query::select(LISTING_SELECT)
            .owned_or_public(viewer)
            .order("start_date", Direction::Asc);
        self.client.fetch(scope, TRIPS, &query).await
    }

    async fn find_visible_detail(
        &self,
        scope: &AccessScope,
        id: Uuid,
        viewer: &UserId,
    ) -> Result<Option<TripDetail>, BackendError> {
        let query = Query::select(DETAIL_SELECT)
            .eq("id", id)
            .owned_or_public(viewer);
        self.client.fetch_one(scope, TRIPS, query).await
    }

    async fn find_owned(
        &self,
        scope: &AccessScope,
        id: Uuid,
        owner: &UserId,
    ) -> Result<Option<Trip>, BackendError> {
        let query = Query::select("*").eq("id", id).eq("user_id", owner);
        self.client.fetch_one(scope, TRIPS, query).await
    }

    async fn update(
        &self,
        scope: &AccessScope,
        id: Uuid,
        changes: &TripChanges,
    ) -> Result<Option<Trip>, BackendError> {
        let query = Query::select("*").eq("id", id);
        self.client.update(scope, TRIPS, &query, changes).await
    }

    async fn delete(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        self.client
            .delete(scope, TRIPS, &Query::filter().eq("id", id))
            .await
    }

    async fn list_by_owner(
        &self,
        scope: &AccessScope,
        owner: &UserId,
    ) -> Result<Vec<Trip>, BackendError> {
        let query = Query::select("*")
            .eq("user_id", owner)
            .order("start_date", Direction::Asc);
        self.client.fetch(scope, TRIPS, &query).await
    }
}
