//! `activities`, `activity_types` and `user_activities` over PostgREST.

use async_trait::async_trait;
use uuid::Uuid;

use super::SupabaseBackend;
use super::dto::RatingValueDto;
use super::query::{Direction, Query};
use crate::domain::ports::{ActivityRepository, BackendError};
use crate::domain::{
    AccessScope, Activity, ActivityDetail, ActivityFilter, ActivityListing, ActivityRating,
    ActivityType, NewActivity, NewRating, Page, PageRequest, RatingChanges, RatingSummary, UserId,
};

const ACTIVITIES: &str = "activities";
const TYPES: &str = "activity_types";
const RATINGS: &str = "user_activities";
const LISTING_SELECT: &str = "*, activity_types(name,icon), destinations(id,name,country)";
const DETAIL_SELECT: &str = "*, activity_types(*), destinations(*), \
     user_activities(id,rating,review,users(id,name,profile_picture))";

fn filtered(filter: &ActivityFilter) -> Query {
    let mut query = Query::select(LISTING_SELECT);
    if let Some(destination_id) = filter.destination_id {
        query = query.eq("destination_id", destination_id);
    }
    if let Some(type_id) = filter.type_id {
        query = query.eq("type_id", type_id);
    }
    if let Some(min_price) = filter.min_price {
        query = query.gte("price", min_price);
    }
    if let Some(max_price) = filter.max_price {
        query = query.lte("price", max_price);
    }
    query.order("created_at", Direction::Desc)
}

#[async_trait]
impl ActivityRepository for SupabaseBackend {
    async fn list(
        &self,
        scope: &AccessScope,
        filter: &ActivityFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityListing>, BackendError> {
        self.client
            .fetch_page(scope, ACTIVITIES, filtered(filter), page)
            .await
    }

    async fn types(&self, scope: &AccessScope) -> Result<Vec<ActivityType>, BackendError> {
        let query = Query::select("*").order("name", Direction::Asc);
        self.client.fetch(scope, TYPES, &query).await
    }

    async fn find_detail(
        &self,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<ActivityDetail>, BackendError> {
        let query = Query::select(DETAIL_SELECT).eq("id", id);
        self.client.fetch_one(scope, ACTIVITIES, query).await
    }

    async fn find(&self, scope: &AccessScope, id: Uuid) -> Result<Option<Activity>, BackendError> {
        let query = Query::select("*").eq("id", id);
        self.client.fetch_one(scope, ACTIVITIES, query).await
    }

    async fn insert(
        &self,
        scope: &AccessScope,
        activity: &NewActivity,
    ) -> Result<Activity, BackendError> {
        self.client.insert(scope, ACTIVITIES, activity, "*").await
    }

    async fn find_rating(
        &self,
        scope: &AccessScope,
        activity_id: Uuid,
        user: &UserId,
    ) -> Result<Option<ActivityRating>, BackendError> {
        let query = Query::select("*")
            .eq("activity_id", activity_id)
            .eq("user_id", user);
        self.client.fetch_one(scope, RATINGS, query).await
    }

    async fn insert_rating(
        &self,
        scope: &AccessScope,
        rating: &NewRating,
    ) -> Result<ActivityRating, BackendError> {
        self.client.insert(scope, RATINGS, rating, "*").await
    }

    async fn update_rating(
        &self,
        scope: &AccessScope,
        id: Uuid,
        changes: &RatingChanges,
    ) -> Result<ActivityRating, BackendError> {
        let query = Query::select("*").eq("id", id);
        self.client
            .update(scope, RATINGS, &query, changes)
            .await?
            .ok_or_else(|| BackendError::rejected("no user_activities row matched"))
    }

    async fn rating_values(
        &self,
        scope: &AccessScope,
        activity_id: Uuid,
    ) -> Result<Vec<f64>, BackendError> {
        let query = Query::select("rating").eq("activity_id", activity_id);
        let rows: Vec<RatingValueDto> = self.client.fetch(scope, RATINGS, &query).await?;
        Ok(rows.into_iter().map(|row| row.rating).collect())
    }

    async fn update_rating_summary(
        &self,
        scope: &AccessScope,
        activity_id: Uuid,
        summary: &RatingSummary,
    ) -> Result<(), BackendError> {
        let body = serde_json::to_value(summary)
            .map_err(|error| BackendError::decode(format!("unserialisable summary: {error}")))?;
        self.client
            .patch(scope, ACTIVITIES, &Query::filter().eq("id", activity_id), &body)
            .await
    }
}
