//! Domain primitives, aggregates and the services that orchestrate them.
//!
//! Purpose: define strongly typed travel-planning entities and the
//! use-cases behind each REST resource. Types document their invariants and
//! serialisation contracts (serde) in their Rustdoc; services depend only on
//! the driven ports in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - One service per resource: auth, profiles, trips, destinations,
//!   activities, bookings, posts and comments.

pub mod activity;
pub mod auth;
pub mod booking;
pub mod comment;
pub mod destination;
pub mod error;
pub mod pagination;
pub(crate) mod patch;
pub mod ports;
pub mod post;
pub mod trace_id;
pub mod trip;
pub mod user;

mod activity_service;
mod auth_service;
mod booking_service;
mod comment_service;
mod destination_service;
mod post_service;
mod profile_service;
mod trip_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::activity::{
    Activity, ActivityDetail, ActivityFilter, ActivityListing, ActivityRating, ActivityType,
    ActivityWithType, CategoryType, DestinationRef, MAX_RATING, MIN_RATING, NewActivity,
    NewRating, RatingChanges, RatingScore, RatingSummary, RatingView, TypeBadge,
};
pub use self::activity_service::{ActivityDraft, ActivityService};
pub use self::auth::{
    AccessScope, AccessToken, AuthAccount, AuthSession, Caller, Credentials,
    CredentialsValidationError, MIN_PASSWORD_LEN, NewPassword, Registration, UserRole,
};
pub use self::auth_service::{AuthService, NOT_AUTHENTICATED};
pub use self::booking::{
    Booking, BookingChanges, BookingFilter, BookingType, BookingView, BookingWithType,
    DEFAULT_BOOKING_STATUS, NewBooking,
};
pub use self::booking_service::{BookingDraft, BookingService};
pub use self::comment::{Comment, CommentFilter, CommentView, NewComment};
pub use self::comment_service::{CommentDraft, CommentService};
pub use self::destination::{
    DEFAULT_CURRENCY, DEFAULT_SHORTLIST_LIMIT, Destination, DestinationDetail, DestinationFilter,
    DestinationSummary, DestinationTrip, NewDestination,
};
pub use self::destination_service::{DestinationDraft, DestinationService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::pagination::{
    DEFAULT_PAGE_LIMIT, Page, PageRequest, PageRequestError, Pagination,
};
pub use self::post::{
    CounterColumn, LikeRef, LikeToggle, NewPost, Post, PostChanges, PostDetail, PostFilter,
    PostLike, PostView,
};
pub use self::post_service::{PostDraft, PostService};
pub use self::profile_service::ProfileService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trip::{NewTrip, Trip, TripChanges, TripDetail, TripListing, TripWithDestination};
pub use self::trip_service::{TripDraft, TripService};
pub use self::user::{
    AccountProfile, Follow, NewProfile, ProfileChanges, PublicProfile, UserId, UserProfile,
    UserSummary,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use roamwise::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
