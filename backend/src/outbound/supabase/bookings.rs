//! `bookings` and `booking_types` over PostgREST.

use async_trait::async_trait;
use uuid::Uuid;

use super::SupabaseBackend;
use super::query::{Direction, Query};
use crate::domain::ports::{BackendError, BookingRepository};
use crate::domain::{
    AccessScope, Booking, BookingChanges, BookingFilter, BookingType, BookingView, NewBooking,
    Page, PageRequest, UserId,
};

const BOOKINGS: &str = "bookings";
const TYPES: &str = "booking_types";
const VIEW_SELECT: &str = "*, booking_types(*), trips(*, destinations(id,name,country)), \
     activities(*, activity_types(name,icon))";

#[async_trait]
impl BookingRepository for SupabaseBackend {
    async fn list(
        &self,
        scope: &AccessScope,
        owner: &UserId,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, BackendError> {
        let mut query = Query::select(VIEW_SELECT).eq("user_id", owner);
        if let Some(status) = filter.status.as_deref() {
            query = query.eq("status", status);
        }
        if let Some(type_id) = filter.type_id {
            query = query.eq("type_id", type_id);
        }
        let query = query.order("booking_date", Direction::Desc);
        self.client.fetch_page(scope, BOOKINGS, query, page).await
    }

    async fn types(&self, scope: &AccessScope) -> Result<Vec<BookingType>, BackendError> {
        let query = Query::select("*").order("name", Direction::Asc);
        self.client.fetch(scope, TYPES, &query).await
    }

    async fn find_view(
        &self,
        scope: &AccessScope,
        id: Uuid,
        owner: &UserId,
    ) -> Result<Option<BookingView>, BackendError> {
        let query = Query::select(VIEW_SELECT).eq("id", id).eq("user_id", owner);
        self.client.fetch_one(scope, BOOKINGS, query).await
    }

    async fn find_owned(
        &self,
        scope: &AccessScope,
        id: Uuid,
        owner: &UserId,
    ) -> Result<Option<Booking>, BackendError> {
        let query = Query::select("*").eq("id", id).eq("user_id", owner);
        self.client.fetch_one(scope, BOOKINGS, query).await
    }

    async fn insert(
        &self,
        scope: &AccessScope,
        booking: &NewBooking,
    ) -> Result<Booking, BackendError> {
        self.client.insert(scope, BOOKINGS, booking, "*").await
    }

    async fn update(
        &self,
        scope: &AccessScope,
        id: Uuid,
        changes: &BookingChanges,
    ) -> Result<Option<Booking>, BackendError> {
        let query = Query::select("*").eq("id", id);
        self.client.update(scope, BOOKINGS, &query, changes).await
    }

    async fn delete(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        self.client
            .delete(scope, BOOKINGS, &Query::filter().eq("id", id))
            .await
    }
}
