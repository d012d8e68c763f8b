//! Bookable activities, their categories and member ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Destination, UserId, UserSummary};

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 1.0;
/// Highest accepted rating.
pub const MAX_RATING: f64 = 5.0;

/// Row shared by `activity_types` and `booking_types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryType {
    /// Row id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Icon identifier.
    #[serde(default)]
    pub icon: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryType {
    /// Compact `(name, icon)` badge.
    #[must_use]
    pub fn badge(&self) -> TypeBadge {
        TypeBadge {
            name: self.name.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// `activity_types` row.
pub type ActivityType = CategoryType;

/// Category badge embedded as `activity_types(name,icon)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBadge {
    /// Display name.
    pub name: String,
    /// Icon identifier.
    #[serde(default)]
    pub icon: Option<String>,
}

/// `activities` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Row id.
    pub id: Uuid,
    /// Destination offering the activity.
    pub destination_id: Uuid,
    /// Activity category.
    pub type_id: Uuid,
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Meeting point or venue.
    pub location: String,
    /// Price per person.
    #[serde(default)]
    pub price: Option<f64>,
    /// Currency of `price`.
    pub currency: String,
    /// Typical duration.
    #[serde(default)]
    pub duration_hours: Option<f64>,
    /// Gallery URLs.
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Listed publicly.
    pub is_public: bool,
    /// Mean member rating, one decimal.
    #[serde(default)]
    pub average_rating: f64,
    /// Number of ratings.
    #[serde(default)]
    pub rating_count: u32,
    /// Member who listed the activity.
    #[serde(default)]
    pub created_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Activity with its `activity_types(name,icon)` embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityWithType {
    /// The activity row.
    #[serde(flatten)]
    pub activity: Activity,
    /// Category badge.
    #[serde(default)]
    pub activity_types: Option<TypeBadge>,
}

/// Destination badge embedded as `destinations(id,name,country)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRef {
    /// Destination id.
    pub id: Uuid,
    /// Place name.
    pub name: String,
    /// Country.
    pub country: String,
}

impl From<&Destination> for DestinationRef {
    fn from(value: &Destination) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            country: value.country.clone(),
        }
    }
}

/// Activity as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityListing {
    /// The activity row.
    #[serde(flatten)]
    pub activity: Activity,
    /// Category badge.
    #[serde(default)]
    pub activity_types: Option<TypeBadge>,
    /// Destination badge.
    #[serde(default)]
    pub destinations: Option<DestinationRef>,
}

/// Filters for the activity listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFilter {
    /// Restrict to one destination.
    pub destination_id: Option<Uuid>,
    /// Restrict to one category.
    pub type_id: Option<Uuid>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
}

impl ActivityFilter {
    /// Evaluate the filter against a row. Price bounds exclude unpriced rows.
    #[must_use]
    pub fn matches(&self, activity: &Activity) -> bool {
        self.destination_id
            .is_none_or(|id| activity.destination_id == id)
            && self.type_id.is_none_or(|id| activity.type_id == id)
            && self
                .min_price
                .is_none_or(|min| activity.price.is_some_and(|price| price >= min))
            && self
                .max_price
                .is_none_or(|max| activity.price.is_some_and(|price| price <= max))
    }
}

/// A member's rating embedded as `user_activities(id,rating,review,users(..))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingView {
    /// Rating row id.
    pub id: Uuid,
    /// Score in `[1, 5]`.
    pub rating: f64,
    /// Optional review text.
    #[serde(default)]
    pub review: Option<String>,
    /// Author badge.
    #[serde(default)]
    pub users: Option<UserSummary>,
}

/// Activity with its full category, destination and ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetail {
    /// The activity row.
    #[serde(flatten)]
    pub activity: Activity,
    /// Full category row.
    #[serde(default)]
    pub activity_types: Option<ActivityType>,
    /// Full destination row.
    #[serde(default)]
    pub destinations: Option<Destination>,
    /// Member ratings.
    #[serde(default)]
    pub user_activities: Vec<RatingView>,
}

/// Validated input for a new activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewActivity {
    /// Destination offering the activity.
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
    /// Currency.
    pub currency: String,
    /// Duration.
    pub duration_hours: Option<f64>,
    /// Gallery URLs.
    pub image_urls: Vec<String>,
    /// Listed publicly.
    pub is_public: bool,
    /// Listing member.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// `user_activities` row: one member's rating of one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRating {
    /// Row id.
    pub id: Uuid,
    /// Rating author.
    pub user_id: UserId,
    /// Rated activity.
    pub activity_id: Uuid,
    /// Score in `[1, 5]`.
    pub rating: f64,
    /// Review text.
    #[serde(default)]
    pub review: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated input for a first rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRating {
    /// Rating author.
    pub user_id: UserId,
    /// Rated activity.
    pub activity_id: Uuid,
    /// Score.
    pub rating: f64,
    /// Review text.
    pub review: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Replacement values for an existing rating. A missing review clears it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingChanges {
    /// Score.
    pub rating: f64,
    /// Review text.
    pub review: Option<String>,
    /// Update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A rating score validated to lie in `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScore(f64);

impl RatingScore {
    /// Accept finite scores in range.
    #[must_use]
    pub fn new(raw: f64) -> Option<Self> {
        (raw.is_finite() && (MIN_RATING..=MAX_RATING).contains(&raw)).then_some(Self(raw))
    }

    /// The score.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// Aggregate written back to `activities` after every rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal, `0` when unrated.
    pub average_rating: f64,
    /// Number of ratings.
    pub rating_count: u32,
    /// Time of recomputation.
    pub updated_at: DateTime<Utc>,
}

impl RatingSummary {
    /// Reduce a set of scores to the stored summary.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use roamwise::domain::RatingSummary;
    ///
    /// let summary = RatingSummary::from_ratings(&[4.0, 5.0, 5.0], Utc::now());
    /// assert_eq!(summary.average_rating, 4.7);
    /// assert_eq!(summary.rating_count, 3);
    /// ```
    #[must_use]
    pub fn from_ratings(ratings: &[f64], updated_at: DateTime<Utc>) -> Self {
        let rating_count = u32::try_from(ratings.len()).unwrap_or(u32::MAX);
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
            (mean * 10.0).round() / 10.0
        };
        Self {
            average_rating,
            rating_count,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], 0.0, 0)]
    #[case(&[5.0], 5.0, 1)]
    #[case(&[4.0, 5.0, 5.0], 4.7, 3)]
    #[case(&[1.0, 2.0], 1.5, 2)]
    #[case(&[3.0, 4.0, 4.0], 3.7, 3)]
    fn summary_rounds_mean_to_one_decimal(
        #[case] ratings: &[f64],
        #[case] average: f64,
        #[case] count: u32,
    ) {
        let summary = RatingSummary::from_ratings(ratings, Utc::now());
        assert!((summary.average_rating - average).abs() < f64::EPSILON);
        assert_eq!(summary.rating_count, count);
    }

    #[rstest]
    #[case(0.5, false)]
    #[case(1.0, true)]
    #[case(5.0, true)]
    #[case(5.5, false)]
    #[case(f64::NAN, false)]
    fn rating_scores_must_lie_in_range(#[case] raw: f64, #[case] ok: bool) {
        assert_eq!(RatingScore::new(raw).is_some(), ok);
    }

    #[rstest]
    fn listing_flattens_the_row_beside_its_embeds() {
        let listing = ActivityListing {
            activity: Activity {
                id: Uuid::nil(),
                destination_id: Uuid::nil(),
                type_id: Uuid::nil(),
                name: "Tea ceremony".to_owned(),
                description: None,
                location: "Gion".to_owned(),
                price: Some(40.0),
                currency: "USD".to_owned(),
                duration_hours: Some(1.5),
                image_urls: Vec::new(),
                is_public: true,
                average_rating: 0.0,
                rating_count: 0,
                created_by: None,
                created_at: Utc::now(),
                updated_at: None,
            },
            activity_types: Some(TypeBadge {
                name: "Culture".to_owned(),
                icon: None,
            }),
            destinations: None,
        };
        let value = serde_json::to_value(&listing).expect("encodes");
        assert_eq!(value["name"], "Tea ceremony");
        assert_eq!(value["activity_types"]["name"], "Culture");
        let decoded: ActivityListing = serde_json::from_value(value).expect("decodes");
        assert_eq!(decoded, listing);
    }
}
