//! `destinations` table with activity and trip embeds.

use async_trait::async_trait;
use uuid::Uuid;

use super::InMemoryBackend;
use crate::domain::ports::{BackendError, DestinationRepository};
use crate::domain::{
    AccessScope, Destination, DestinationDetail, DestinationFilter, DestinationTrip,
    NewDestination, Page, PageRequest,
};

fn shortlist(mut rows: Vec<Destination>, limit: u32) -> Vec<Destination> {
    rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    rows
}

#[async_trait]
impl DestinationRepository for InMemoryBackend {
    async fn list(
        &self,
        _scope: &AccessScope,
        filter: &DestinationFilter,
        page: PageRequest,
    ) -> Result<Page<Destination>, BackendError> {
        let tables = self.lock()?;
        let mut rows: Vec<Destination> = tables
            .destinations
            .iter()
            .filter(|destination| filter.matches(destination))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Page::from_all(rows, page))
    }

    async fn popular(
        &self,
        _scope: &AccessScope,
        limit: u32,
    ) -> Result<Vec<Destination>, BackendError> {
        let mut rows = self.lock()?.destinations.clone();
        rows.sort_by(|a, b| b.trip_count.cmp(&a.trip_count));
        Ok(shortlist(rows, limit))
    }

    async fn search(
        &self,
        _scope: &AccessScope,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Destination>, BackendError> {
        let rows = self
            .lock()?
            .destinations
            .iter()
            .filter(|destination| destination.matches_text(query))
            .cloned()
            .collect();
        Ok(shortlist(rows, limit))
    }

    async fn find_detail(
        &self,
        _scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<DestinationDetail>, BackendError> {
        let tables = self.lock()?;
        let Some(destination) = tables.destination(id) else {
            return Ok(None);
        };
        Ok(Some(DestinationDetail {
            destination: destination.clone(),
            activities: tables
                .activities
                .iter()
                .filter(|activity| activity.destination_id == id)
                .map(|activity| tables.activity_with_type(activity))
                .collect(),
            trips: tables
                .trips
                .iter()
                .filter(|trip| trip.destination_id == id)
                .map(|trip| DestinationTrip {
                    id: trip.id,
                    start_date: trip.start_date,
                    end_date: trip.end_date,
                    users: tables.user_summary(&trip.user_id),
                })
                .collect(),
        }))
    }

    async fn insert(
        &self,
        _scope: &AccessScope,
        destination: &NewDestination,
    ) -> Result<Destination, BackendError> {
        let row = Destination {
            id: Uuid::new_v4(),
            name: destination.name.clone(),
            country: destination.country.clone(),
            description: destination.description.clone(),
            image_url: destination.image_url.clone(),
            best_time_to_visit: destination.best_time_to_visit.clone(),
            average_cost_per_day: destination.average_cost_per_day,
            currency: destination.currency.clone(),
            timezone: destination.timezone.clone(),
            language: destination.language.clone(),
            visa_requirements: destination.visa_requirements.clone(),
            safety_rating: destination.safety_rating,
            average_rating: None,
            trip_count: 0,
            created_by: Some(destination.created_by),
            created_at: destination.created_at,
        };
        self.lock()?.destinations.push(row.clone());
        Ok(row)
    }
}
