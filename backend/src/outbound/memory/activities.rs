//! `activities`, `activity_types` and `user_activities` tables.

use async_trait::async_trait;
use uuid::Uuid;

use super::InMemoryBackend;
use crate::domain::ports::{ActivityRepository, BackendError};
use crate::domain::{
    AccessScope, Activity, ActivityDetail, ActivityFilter, ActivityListing, ActivityRating,
    ActivityType, DestinationRef, NewActivity, NewRating, Page, PageRequest, RatingChanges,
    RatingSummary, RatingView, UserId,
};

#[async_trait]
impl ActivityRepository for InMemoryBackend {
    async fn list(
        &self,
        _scope: &AccessScope,
        filter: &ActivityFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityListing>, BackendError> {
        let tables = self.lock()?;
        let mut rows: Vec<&Activity> = tables
            .activities
            .iter()
            .filter(|activity| filter.matches(activity))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let listings = rows
            .into_iter()
            .map(|activity| {
                let typed = tables.activity_with_type(activity);
                ActivityListing {
                    activity: typed.activity,
                    activity_types: typed.activity_types,
                    destinations: tables
                        .destination(activity.destination_id)
                        .map(DestinationRef::from),
                }
            })
            .collect();
        Ok(Page::from_all(listings, page))
    }

    async fn types(&self, _scope: &AccessScope) -> Result<Vec<ActivityType>, BackendError> {
        let mut types = self.lock()?.activity_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn find_detail(
        &self,
        _scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<ActivityDetail>, BackendError> {
        let tables = self.lock()?;
        let Some(activity) = tables.activity(id) else {
            return Ok(None);
        };
        Ok(Some(ActivityDetail {
            activity: activity.clone(),
            activity_types: tables
                .activity_types
                .iter()
                .find(|kind| kind.id == activity.type_id)
                .cloned(),
            destinations: tables.destination(activity.destination_id).cloned(),
            user_activities: tables
                .ratings
                .iter()
                .filter(|rating| rating.activity_id == id)
                .map(|rating| RatingView {
                    id: rating.id,
                    rating: rating.rating,
                    review: rating.review.clone(),
                    users: tables.user_summary(&rating.user_id),
                })
                .collect(),
        }))
    }

    async fn find(&self, _scope: &AccessScope, id: Uuid) -> Result<Option<Activity>, BackendError> {
        Ok(self.lock()?.activity(id).cloned())
    }

    async fn insert(
        &self,
        _scope: &AccessScope,
        activity: &NewActivity,
    ) -> Result<Activity, BackendError> {
        let mut tables = self.lock()?;
        if tables.destination(activity.destination_id).is_none() {
            return Err(BackendError::rejected(
                "insert or update on table \"activities\" violates foreign key constraint \"activities_destination_id_fkey\"",
            ));
        }
        if !tables
            .activity_types
            .iter()
            .any(|kind| kind.id == activity.type_id)
        {
            return Err(BackendError::rejected(
                "insert or update on table \"activities\" violates foreign key constraint \"activities_type_id_fkey\"",
            ));
        }
        let row = Activity {
            id: Uuid::new_v4(),
            destination_id: activity.destination_id,
            type_id: activity.type_id,
            name: activity.name.clone(),
            description: activity.description.clone(),
            location: activity.location.clone(),
            price: activity.price,
            currency: activity.currency.clone(),
            duration_hours: activity.duration_hours,
            image_urls: activity.image_urls.clone(),
            is_public: activity.is_public,
            average_rating: 0.0,
            rating_count: 0,
            created_by: Some(activity.created_by),
            created_at: activity.created_at,
            updated_at: None,
        };
        tables.activities.push(row.clone());
        Ok(row)
    }

    async fn find_rating(
        &self,
        _scope: &AccessScope,
        activity_id: Uuid,
        user: &UserId,
    ) -> Result<Option<ActivityRating>, BackendError> {
        Ok(self
            .lock()?
            .ratings
            .iter()
            .find(|rating| rating.activity_id == activity_id && &rating.user_id == user)
            .cloned())
    }

    async fn insert_rating(
        &self,
        _scope: &AccessScope,
        rating: &NewRating,
    ) -> Result<ActivityRating, BackendError> {
        let row = ActivityRating {
            id: Uuid::new_v4(),
            user_id: rating.user_id,
            activity_id: rating.activity_id,
            rating: rating.rating,
            review: rating.review.clone(),
            created_at: rating.created_at,
            updated_at: None,
        };
        self.lock()?.ratings.push(row.clone());
        Ok(row)
    }

    async fn update_rating(
        &self,
        _scope: &AccessScope,
        id: Uuid,
        changes: &RatingChanges,
    ) -> Result<ActivityRating, BackendError> {
        let mut tables = self.lock()?;
        let row = tables
            .ratings
            .iter_mut()
            .find(|rating| rating.id == id)
            .ok_or_else(|| BackendError::rejected("no user_activities row matched"))?;
        row.rating = changes.rating;
        row.review.clone_from(&changes.review);
        row.updated_at = Some(changes.updated_at);
        Ok(row.clone())
    }

    async fn rating_values(
        &self,
        _scope: &AccessScope,
        activity_id: Uuid,
    ) -> Result<Vec<f64>, BackendError> {
        Ok(self
            .lock()?
            .ratings
            .iter()
            .filter(|rating| rating.activity_id == activity_id)
            .map(|rating| rating.rating)
            .collect())
    }

    async fn update_rating_summary(
        &self,
        _scope: &AccessScope,
        activity_id: Uuid,
        summary: &RatingSummary,
    ) -> Result<(), BackendError> {
        let mut tables = self.lock()?;
        if let Some(activity) = tables
            .activities
            .iter_mut()
            .find(|activity| activity.id == activity_id)
        {
            activity.average_rating = summary.average_rating;
            activity.rating_count = summary.rating_count;
            activity.updated_at = Some(summary.updated_at);
        }
        Ok(())
    }
}
