//! Destination catalogue: browse, rank, search and contribute places.

use std::sync::Arc;

use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::DestinationRepository;
use crate::domain::{
    AccessScope, Caller, DEFAULT_CURRENCY, Destination, DestinationDetail, DestinationFilter,
    Error, NewDestination, Page, PageRequest,
};

/// Caller-supplied fields for a new destination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationDraft {
    /// Place name.
    pub name: String,
    /// Country.
    pub country: String,
    /// Long description.
    pub description: Option<String>,
    /// Hero image URL.
    pub image_url: Option<String>,
    /// Seasonal advice.
    pub best_time_to_visit: Option<String>,
    /// Typical daily spend.
    pub average_cost_per_day: Option<f64>,
    /// Currency, `USD` when omitted.
    pub currency: Option<String>,
    /// IANA timezone.
    pub timezone: Option<String>,
    /// Main language.
    pub language: Option<String>,
    /// Visa notes.
    pub visa_requirements: Option<String>,
    /// Safety score.
    pub safety_rating: Option<f64>,
}

/// Service behind the `/api/destinations` routes.
#[derive(Clone)]
pub struct DestinationService {
    destinations: Arc<dyn DestinationRepository>,
    clock: Arc<dyn Clock>,
}

impl DestinationService {
    /// Create a service over the given repository.
    pub fn new(destinations: Arc<dyn DestinationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            destinations,
            clock,
        }
    }

    /// Filtered, paginated listing.
    pub async fn list(
        &self,
        filter: &DestinationFilter,
        page: PageRequest,
    ) -> Result<Page<Destination>, Error> {
        self.destinations
            .list(&AccessScope::Anonymous, filter, page)
            .await
            .map_err(|err| err.into_internal("Failed to fetch destinations"))
    }

    /// Destinations with the most planned trips.
    pub async fn popular(&self, limit: u32) -> Result<Vec<Destination>, Error> {
        self.destinations
            .popular(&AccessScope::Anonymous, limit)
            .await
            .map_err(|err| err.into_internal("Failed to fetch popular destinations"))
    }

    /// Name or country search.
    ///
    /// The query must contain at least one letter or digit; punctuation on
    /// its own is treated as a missing query.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Destination>, Error> {
        let query = query.trim();
        if !query.chars().any(char::is_alphanumeric) {
            return Err(Error::invalid_request("Search query is required"));
        }
        self.destinations
            .search(&AccessScope::Anonymous, query, limit)
            .await
            .map_err(|err| err.into_internal("Failed to search destinations"))
    }

    /// A destination with its activities and trips.
    pub async fn detail(&self, id: Uuid) -> Result<DestinationDetail, Error> {
        self.destinations
            .find_detail(&AccessScope::Anonymous, id)
            .await
            .map_err(|err| err.into_internal("Failed to fetch destination"))?
            .ok_or_else(|| Error::not_found("Destination not found"))
    }

    /// Add a destination on the caller's behalf.
    pub async fn create(
        &self,
        caller: &Caller,
        draft: DestinationDraft,
    ) -> Result<Destination, Error> {
        let destination = NewDestination {
            name: draft.name,
            country: draft.country,
            description: draft.description,
            image_url: draft.image_url,
            best_time_to_visit: draft.best_time_to_visit,
            average_cost_per_day: draft.average_cost_per_day,
            currency: draft
                .currency
                .filter(|currency| !currency.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
            timezone: draft.timezone,
            language: draft.language,
            visa_requirements: draft.visa_requirements,
            safety_rating: draft.safety_rating,
            created_by: *caller.id(),
            created_at: self.clock.utc(),
        };
        self.destinations
            .insert(&caller.scope(), &destination)
            .await
            .map_err(|err| err.into_internal("Failed to create destination"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{BackendError, MockDestinationRepository};
    use crate::domain::test_fixtures::{caller, fixture_clock};
    use rstest::rstest;

    fn make_service(repo: MockDestinationRepository) -> DestinationService {
        DestinationService::new(Arc::new(repo), fixture_clock())
    }

    #[rstest]
    #[case("   ")]
    #[case("()")]
    #[case(" *%, ")]
    #[tokio::test]
    async fn blank_search_is_rejected_before_querying(#[case] query: &str) {
        let mut repo = MockDestinationRepository::new();
        repo.expect_search().never();

        let err = make_service(repo)
            .search(query, 10)
            .await
            .expect_err("blank query");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Search query is required");
    }

    #[tokio::test]
    async fn create_defaults_currency_and_records_creator() {
        let me = caller();
        let creator = *me.id();
        let mut repo = MockDestinationRepository::new();
        repo.expect_insert()
            .withf(move |_, destination| {
                destination.currency == "USD" && destination.created_by == creator
            })
            .times(1)
            .return_once(|_, _| Err(BackendError::rejected("stop here")));

        let draft = DestinationDraft {
            name: "Lisbon".to_owned(),
            country: "Portugal".to_owned(),
            ..DestinationDraft::default()
        };
        let err = make_service(repo)
            .create(&me, draft)
            .await
            .expect_err("insert fails");
        assert_eq!(err.message(), "Failed to create destination");
    }

    #[tokio::test]
    async fn missing_destination_is_not_found() {
        let mut repo = MockDestinationRepository::new();
        repo.expect_find_detail().return_once(|_, _| Ok(None));

        let err = make_service(repo)
            .detail(Uuid::new_v4())
            .await
            .expect_err("missing");
        assert_eq!(err.message(), "Destination not found");
    }
}
