//! Activity catalogue and the rating aggregate.
//!
//! Rating is a read-modify-write without concurrency control: the caller's
//! rating row is upserted, every score for the activity is re-read and the
//! rounded mean is written back. Concurrent raters may overwrite each
//! other's summary; the last write wins.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ActivityRepository, BackendError};
use crate::domain::{
    AccessScope, Activity, ActivityDetail, ActivityFilter, ActivityListing, ActivityRating,
    ActivityType, Caller, DEFAULT_CURRENCY, Error, NewActivity, NewRating, Page, PageRequest,
    RatingChanges, RatingScore, RatingSummary,
};

const RATE_FAILED: &str = "Failed to rate activity";

/// Caller-supplied fields for a new activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    /// Destination offering it.
    pub destination_id: Uuid,
    /// Category.
    pub type_id: Uuid,
    /// Display name.
    pub name: String,
    /// Venue.
    pub location: String,
    /// Description.
    pub description: Option<String>,
    /// Price.
    pub price: Option<f64>,
    /// Currency, `USD` when omitted.
    pub currency: Option<String>,
    /// Duration.
    pub duration_hours: Option<f64>,
    /// Gallery, empty when omitted.
    pub image_urls: Option<Vec<String>>,
    /// Visibility, public when omitted.
    pub is_public: Option<bool>,
}

/// Service behind the `/api/activities` routes.
#[derive(Clone)]
pub struct ActivityService {
    activities: Arc<dyn ActivityRepository>,
    clock: Arc<dyn Clock>,
}

impl ActivityService {
    /// Create a service over the given repository.
    pub fn new(activities: Arc<dyn ActivityRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { activities, clock }
    }

    /// Filtered, paginated listing, newest first.
    pub async fn list(
        &self,
        filter: &ActivityFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityListing>, Error> {
        self.activities
            .list(&AccessScope::Anonymous, filter, page)
            .await
            .map_err(|err| err.into_internal("Failed to fetch activities"))
    }

    /// Every activity type.
    pub async fn types(&self) -> Result<Vec<ActivityType>, Error> {
        self.activities
            .types(&AccessScope::Anonymous)
            .await
            .map_err(|err| err.into_internal("Failed to fetch activity types"))
    }

    /// An activity with its type, destination and ratings.
    pub async fn detail(&self, id: Uuid) -> Result<ActivityDetail, Error> {
        self.activities
            .find_detail(&AccessScope::Anonymous, id)
            .await
            .map_err(|err| err.into_internal("Failed to fetch activity"))?
            .ok_or_else(|| Error::not_found("Activity not found"))
    }

    /// List an activity on the caller's behalf.
    pub async fn create(&self, caller: &Caller, draft: ActivityDraft) -> Result<Activity, Error> {
        let activity = NewActivity {
            destination_id: draft.destination_id,
            type_id: draft.type_id,
            name: draft.name,
            location: draft.location,
            description: draft.description,
            price: draft.price,
            currency: draft
                .currency
                .filter(|currency| !currency.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
            duration_hours: draft.duration_hours,
            image_urls: draft.image_urls.unwrap_or_default(),
            is_public: draft.is_public.unwrap_or(true),
            created_by: *caller.id(),
            created_at: self.clock.utc(),
        };
        self.activities
            .insert(&caller.scope(), &activity)
            .await
            .map_err(|err| err.into_internal("Failed to create activity"))
    }

    /// Record the caller's rating and refresh the activity's summary.
    pub async fn rate(
        &self,
        caller: &Caller,
        activity_id: Uuid,
        score: RatingScore,
        review: Option<String>,
    ) -> Result<ActivityRating, Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal(RATE_FAILED);
        let review = review.filter(|text| !text.trim().is_empty());

        if self
            .activities
            .find(&scope, activity_id)
            .await
            .map_err(failed)?
            .is_none()
        {
            return Err(Error::not_found("Activity not found"));
        }

        let now = self.clock.utc();
        let rating = match self
            .activities
            .find_rating(&scope, activity_id, caller.id())
            .await
            .map_err(failed)?
        {
            Some(existing) => {
                let changes = RatingChanges {
                    rating: score.value(),
                    review,
                    updated_at: now,
                };
                self.activities
                    .update_rating(&scope, existing.id, &changes)
                    .await
                    .map_err(failed)?
            }
            None => {
                let rating = NewRating {
                    user_id: *caller.id(),
                    activity_id,
                    rating: score.value(),
                    review,
                    created_at: now,
                };
                self.activities
                    .insert_rating(&scope, &rating)
                    .await
                    .map_err(failed)?
            }
        };

        self.refresh_summary(&scope, activity_id).await?;
        Ok(rating)
    }

    async fn refresh_summary(&self, scope: &AccessScope, activity_id: Uuid) -> Result<(), Error> {
        let failed = |err: BackendError| err.into_internal(RATE_FAILED);
        let scores = self
            .activities
            .rating_values(scope, activity_id)
            .await
            .map_err(failed)?;
        let summary = RatingSummary::from_ratings(&scores, self.clock.utc());
        debug!(
            %activity_id,
            average = summary.average_rating,
            count = summary.rating_count,
            "recomputed activity rating"
        );
        self.activities
            .update_rating_summary(scope, activity_id, &summary)
            .await
            .map_err(failed)
    }
}

#[cfg(test)]
#[path = "activity_service_tests.rs"]
mod tests;
