//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The wrappers mirror the row shape of their domain types. Embedded
//! relations are documented as free-form objects keyed by table name.

#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa when generating OpenAPI"
)]

use serde_json::Value;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Trip not found")]
    error: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details such as `{ field, code, value }`.
    details: Option<Value>,
}

/// Confirmation body carrying only a message.
#[derive(ToSchema)]
pub struct MessageSchema {
    /// Outcome description.
    #[schema(example = "Trip deleted successfully")]
    message: String,
}

/// OpenAPI schema for [`crate::domain::Pagination`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Pagination)]
pub struct PaginationSchema {
    /// Rows matching the filters.
    total: u64,
    /// Page size.
    limit: u32,
    /// Rows skipped.
    offset: u32,
}

/// OpenAPI schema for [`crate::domain::UserProfile`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserProfile)]
pub struct UserProfileSchema {
    /// Account id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Login email.
    email: String,
    /// Display name.
    name: String,
    /// Biography.
    bio: Option<String>,
    /// Avatar URL.
    profile_picture: Option<String>,
    /// Client-defined preferences.
    preferences: Option<Value>,
    /// Creation time.
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    /// Last update.
    #[schema(value_type = Option<String>, format = DateTime)]
    updated_at: Option<String>,
}

/// OpenAPI schema for [`crate::domain::PublicProfile`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PublicProfile)]
pub struct PublicProfileSchema {
    /// Account id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Display name.
    name: String,
    /// Biography.
    bio: Option<String>,
    /// Avatar URL.
    profile_picture: Option<String>,
    /// Creation time.
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Trip`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Trip)]
pub struct TripSchema {
    /// Trip id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Owner.
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    /// Destination.
    #[schema(value_type = String, format = Uuid)]
    destination_id: String,
    /// Departure.
    #[schema(value_type = String, format = DateTime)]
    start_date: String,
    /// Return.
    #[schema(value_type = String, format = DateTime)]
    end_date: String,
    /// Planned spend.
    budget: Option<f64>,
    /// Free-form notes.
    notes: Option<String>,
    /// Visible to other members.
    is_public: bool,
    /// Embedded `destinations` row, where selected.
    destinations: Option<Value>,
    /// Embedded owner summary, where selected.
    users: Option<Value>,
    /// Creation time.
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Destination`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Destination)]
pub struct DestinationSchema {
    /// Destination id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Place name.
    #[schema(example = "Kyoto")]
    name: String,
    /// Country.
    #[schema(example = "Japan")]
    country: String,
    /// Long description.
    description: Option<String>,
    /// Hero image.
    image_url: Option<String>,
    /// Seasonal advice.
    best_time_to_visit: Option<String>,
    /// Typical daily spend.
    average_cost_per_day: Option<f64>,
    /// Currency code.
    currency: String,
    /// Mean rating.
    average_rating: Option<f64>,
    /// Trips planned here.
    trip_count: i64,
    /// Embedded `activities`, on detail reads.
    activities: Option<Vec<Value>>,
    /// Embedded `trips`, on detail reads.
    trips: Option<Vec<Value>>,
}

/// OpenAPI schema for [`crate::domain::CategoryType`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CategoryType)]
pub struct CategoryTypeSchema {
    /// Type id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Display name.
    name: String,
    /// Icon name.
    icon: Option<String>,
    /// Description.
    description: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Activity`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Activity)]
pub struct ActivitySchema {
    /// Activity id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Destination.
    #[schema(value_type = String, format = Uuid)]
    destination_id: String,
    /// Category.
    #[schema(value_type = String, format = Uuid)]
    type_id: String,
    /// Display name.
    name: String,
    /// Venue.
    location: String,
    /// Price.
    price: Option<f64>,
    /// Currency code.
    currency: String,
    /// Duration.
    duration_hours: Option<f64>,
    /// Gallery.
    image_urls: Vec<String>,
    /// Visible to everyone.
    is_public: bool,
    /// Mean rating, one decimal.
    average_rating: f64,
    /// Number of ratings.
    rating_count: u32,
    /// Embedded `activity_types`, where selected.
    activity_types: Option<Value>,
    /// Embedded `destinations`, where selected.
    destinations: Option<Value>,
    /// Embedded ratings with reviewers, on detail reads.
    user_activities: Option<Vec<Value>>,
}

/// OpenAPI schema for [`crate::domain::ActivityRating`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ActivityRating)]
pub struct ActivityRatingSchema {
    /// Rating id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Reviewer.
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    /// Activity rated.
    #[schema(value_type = String, format = Uuid)]
    activity_id: String,
    /// Score between 1 and 5.
    #[schema(minimum = 1, maximum = 5)]
    rating: f64,
    /// Review text.
    review: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Booking`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Booking)]
pub struct BookingSchema {
    /// Booking id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Owner.
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    /// Trip.
    #[schema(value_type = String, format = Uuid)]
    trip_id: String,
    /// Category.
    #[schema(value_type = String, format = Uuid)]
    type_id: String,
    /// Booked activity.
    #[schema(value_type = Option<String>, format = Uuid)]
    activity_id: Option<String>,
    /// Provider.
    provider_name: Option<String>,
    /// Confirmation code.
    booking_reference: Option<String>,
    /// When booked.
    #[schema(value_type = String, format = DateTime)]
    booking_date: String,
    /// Amount paid.
    amount: f64,
    /// Currency code.
    currency: String,
    /// Status, e.g. `confirmed`.
    status: String,
    /// Notes.
    notes: Option<String>,
    /// Embedded `booking_types`, `trips` and `activities`, where selected.
    booking_types: Option<Value>,
    /// Embedded trip.
    trips: Option<Value>,
    /// Embedded activity.
    activities: Option<Value>,
}

/// OpenAPI schema for [`crate::domain::PostView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PostView)]
pub struct PostSchema {
    /// Post id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Author.
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    /// Destination written about.
    #[schema(value_type = Option<String>, format = Uuid)]
    destination_id: Option<String>,
    /// Headline.
    title: String,
    /// Body.
    content: String,
    /// Gallery.
    images: Vec<String>,
    /// Author's rating.
    rating: Option<f64>,
    /// Visible to everyone.
    is_public: bool,
    /// Likes.
    like_count: u64,
    /// Comments.
    comment_count: u64,
    /// Author summary.
    users: Option<Value>,
    /// Destination summary.
    destinations: Option<Value>,
}

/// OpenAPI schema for [`crate::domain::PostDetail`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PostDetail)]
pub struct PostDetailSchema {
    /// The post with counts and embeds.
    #[schema(inline)]
    #[serde(flatten)]
    post: PostSchema,
    /// Whether the caller likes the post.
    user_liked: bool,
    /// Comments, newest first.
    comments: Vec<CommentSchema>,
    /// `{ user_id }` of each like.
    likes: Vec<Value>,
}

/// OpenAPI schema for [`crate::domain::LikeToggle`].
#[derive(ToSchema)]
#[schema(as = crate::domain::LikeToggle)]
pub struct LikeToggleSchema {
    /// Whether the caller now likes the post.
    liked: bool,
    /// Likes after the toggle.
    like_count: u64,
}

/// OpenAPI schema for [`crate::domain::CommentView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CommentView)]
pub struct CommentSchema {
    /// Comment id.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Post.
    #[schema(value_type = String, format = Uuid)]
    post_id: String,
    /// Author.
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    /// Comment replied to.
    #[schema(value_type = Option<String>, format = Uuid)]
    parent_comment_id: Option<String>,
    /// Body.
    content: String,
    /// Author summary.
    users: Option<Value>,
}

macro_rules! page_schema {
    ($name:ident, $item:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(ToSchema)]
        pub struct $name {
            /// Rows on this page.
            data: Vec<$item>,
            /// Window and total.
            pagination: PaginationSchema,
        }
    };
}

page_schema!(DestinationPageSchema, DestinationSchema, "A page of destinations.");
page_schema!(ActivityPageSchema, ActivitySchema, "A page of activities.");
page_schema!(BookingPageSchema, BookingSchema, "A page of bookings.");
page_schema!(PostPageSchema, PostSchema, "A page of posts.");
page_schema!(CommentPageSchema, CommentSchema, "A page of comments.");
