//! Port for `activities`, `activity_types` and `user_activities`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AccessScope, Activity, ActivityDetail, ActivityFilter, ActivityListing, ActivityRating,
    ActivityType, NewActivity, NewRating, Page, PageRequest, RatingChanges, RatingSummary, UserId,
};

use super::BackendError;

/// Activity catalogue and rating persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Filtered listing, newest first, with an exact total.
    async fn list(
        &self,
        scope: &AccessScope,
        filter: &ActivityFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityListing>, BackendError>;

    /// Every activity type, by name.
    async fn types(&self, scope: &AccessScope) -> Result<Vec<ActivityType>, BackendError>;

    /// An activity with its type, destination and ratings.
    async fn find_detail(
        &self,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<ActivityDetail>, BackendError>;

    /// The bare activity row.
    async fn find(&self, scope: &AccessScope, id: Uuid) -> Result<Option<Activity>, BackendError>;

    /// Insert an activity and return the stored row.
    async fn insert(
        &self,
        scope: &AccessScope,
        activity: &NewActivity,
    ) -> Result<Activity, BackendError>;

    /// The rating `user` gave `activity_id`, if any.
    async fn find_rating(
        &self,
        scope: &AccessScope,
        activity_id: Uuid,
        user: &UserId,
    ) -> Result<Option<ActivityRating>, BackendError>;

    /// Insert a first rating.
    async fn insert_rating(
        &self,
        scope: &AccessScope,
        rating: &NewRating,
    ) -> Result<ActivityRating, BackendError>;

    /// Overwrite an existing rating.
    async fn update_rating(
        &self,
        scope: &AccessScope,
        id: Uuid,
        changes: &RatingChanges,
    ) -> Result<ActivityRating, BackendError>;

    /// Every score given to `activity_id`.
    async fn rating_values(
        &self,
        scope: &AccessScope,
        activity_id: Uuid,
    ) -> Result<Vec<f64>, BackendError>;

    /// Write the recomputed summary back to the activity.
    async fn update_rating_summary(
        &self,
        scope: &AccessScope,
        activity_id: Uuid,
        summary: &RatingSummary,
    ) -> Result<(), BackendError>;
}
