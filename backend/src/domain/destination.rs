//! Destinations: the places trips, activities and posts refer to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActivityWithType, UserId, UserSummary};

/// Currency applied when a caller does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";
/// Default page size for popular and search listings.
pub const DEFAULT_SHORTLIST_LIMIT: u32 = 10;

/// Full `destinations` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Row id.
    pub id: Uuid,
    /// Place name.
    pub name: String,
    /// Country the place is in.
    pub country: String,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Hero image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Free-text seasonal advice.
    #[serde(default)]
    pub best_time_to_visit: Option<String>,
    /// Typical daily spend.
    #[serde(default)]
    pub average_cost_per_day: Option<f64>,
    /// Currency of the cost figures.
    pub currency: String,
    /// IANA timezone name.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Main spoken language.
    #[serde(default)]
    pub language: Option<String>,
    /// Visa notes.
    #[serde(default)]
    pub visa_requirements: Option<String>,
    /// Safety score.
    #[serde(default)]
    pub safety_rating: Option<f64>,
    /// Mean visitor rating.
    #[serde(default)]
    pub average_rating: Option<f64>,
    /// Number of trips planned here.
    #[serde(default)]
    pub trip_count: i64,
    /// Member who added the destination.
    #[serde(default)]
    pub created_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Destination {
    /// Compact projection embedded in other resources.
    #[must_use]
    pub fn summary(&self) -> DestinationSummary {
        DestinationSummary {
            id: self.id,
            name: self.name.clone(),
            country: self.country.clone(),
            image_url: self.image_url.clone(),
        }
    }

    /// Whether the name or country contains `needle`, ignoring case.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.country.to_lowercase().contains(&needle)
    }
}

/// Compact destination badge embedded under `destinations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationSummary {
    /// Destination id.
    pub id: Uuid,
    /// Place name.
    pub name: String,
    /// Country.
    pub country: String,
    /// Hero image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Filters for the destination listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationFilter {
    /// Case-insensitive substring of the country.
    pub country: Option<String>,
    /// Minimum `average_rating`.
    pub min_rating: Option<f64>,
}

impl DestinationFilter {
    /// Evaluate the filter against a row.
    #[must_use]
    pub fn matches(&self, destination: &Destination) -> bool {
        let country_ok = self.country.as_ref().is_none_or(|needle| {
            destination
                .country
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let rating_ok = self
            .min_rating
            .is_none_or(|min| destination.average_rating.is_some_and(|rating| rating >= min));
        country_ok && rating_ok
    }
}

/// A trip summary embedded under a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationTrip {
    /// Trip id.
    pub id: Uuid,
    /// Departure.
    pub start_date: DateTime<Utc>,
    /// Return.
    pub end_date: DateTime<Utc>,
    /// Trip owner.
    #[serde(default)]
    pub users: Option<UserSummary>,
}

/// Destination with its activities and the trips planned there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationDetail {
    /// The destination row.
    #[serde(flatten)]
    pub destination: Destination,
    /// Activities offered here, each with its type badge.
    #[serde(default)]
    pub activities: Vec<ActivityWithType>,
    /// Trips planned here.
    #[serde(default)]
    pub trips: Vec<DestinationTrip>,
}

/// Validated input for a new destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDestination {
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
    /// Currency, defaulting to [`DEFAULT_CURRENCY`].
    pub currency: String,
    /// IANA timezone.
    pub timezone: Option<String>,
    /// Main language.
    pub language: Option<String>,
    /// Visa notes.
    pub visa_requirements: Option<String>,
    /// Safety score.
    pub safety_rating: Option<f64>,
    /// Member adding the destination.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
