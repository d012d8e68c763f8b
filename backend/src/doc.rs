//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every handler under `/api` plus the health probes
//! - **Schemas**: domain type wrappers from
//!   [`crate::inbound::http::schemas`] and the request DTOs declared next to
//!   their handlers
//! - **Security**: bearer tokens, with the session cookie as fallback
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::activities::{CreateActivityRequest, RateActivityRequest};
use crate::inbound::http::auth::{
    AccountBody, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, ResetPasswordRequest, SessionBody,
};
use crate::inbound::http::bookings::{CreateBookingRequest, UpdateBookingRequest};
use crate::inbound::http::comments::{CreateCommentRequest, UpdateCommentRequest};
use crate::inbound::http::destinations::CreateDestinationRequest;
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::posts::{CreatePostRequest, UpdatePostRequest};
use crate::inbound::http::schemas::{
    ActivityPageSchema, ActivityRatingSchema, ActivitySchema, BookingPageSchema, BookingSchema,
    CategoryTypeSchema, CommentPageSchema, CommentSchema, DestinationPageSchema,
    DestinationSchema, ErrorCodeSchema, ErrorSchema, LikeToggleSchema, MessageSchema,
    PaginationSchema, PostDetailSchema, PostPageSchema, PostSchema, PublicProfileSchema,
    TripSchema, UserProfileSchema,
};
use crate::inbound::http::trips::{CreateTripRequest, UpdateTripRequest};
use crate::inbound::http::users::{FollowResponse, UpdateProfileRequest};
use crate::inbound::http::validation::Numeric;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer and session cookie
/// security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Access token returned by POST /api/auth/login."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie set by POST /api/auth/login, used when no bearer token is sent.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Roamwise travel API",
        description = "Trips, destinations, activities, bookings and community posts over a managed backend.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = []), ("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::auth::forgot_password,
        crate::inbound::http::auth::reset_password,
        crate::inbound::http::users::current_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::own_trips,
        crate::inbound::http::users::own_posts,
        crate::inbound::http::users::public_profile,
        crate::inbound::http::users::toggle_follow,
        crate::inbound::http::trips::create_trip,
        crate::inbound::http::trips::list_trips,
        crate::inbound::http::trips::get_trip,
        crate::inbound::http::trips::update_trip,
        crate::inbound::http::trips::delete_trip,
        crate::inbound::http::destinations::list_destinations,
        crate::inbound::http::destinations::popular_destinations,
        crate::inbound::http::destinations::search_destinations,
        crate::inbound::http::destinations::get_destination,
        crate::inbound::http::destinations::create_destination,
        crate::inbound::http::activities::list_activities,
        crate::inbound::http::activities::activity_types,
        crate::inbound::http::activities::get_activity,
        crate::inbound::http::activities::create_activity,
        crate::inbound::http::activities::rate_activity,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::booking_types,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::update_booking,
        crate::inbound::http::bookings::delete_booking,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::post_feed,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::toggle_like,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::get_comment,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MessageSchema,
        PaginationSchema,
        UserProfileSchema,
        PublicProfileSchema,
        TripSchema,
        DestinationSchema,
        DestinationPageSchema,
        CategoryTypeSchema,
        ActivitySchema,
        ActivityPageSchema,
        ActivityRatingSchema,
        BookingSchema,
        BookingPageSchema,
        PostSchema,
        PostPageSchema,
        PostDetailSchema,
        LikeToggleSchema,
        CommentSchema,
        CommentPageSchema,
        HealthStatus,
        Numeric,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        AccountBody,
        SessionBody,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        UpdateProfileRequest,
        FollowResponse,
        CreateTripRequest,
        UpdateTripRequest,
        CreateDestinationRequest,
        CreateActivityRequest,
        RateActivityRequest,
        CreateBookingRequest,
        UpdateBookingRequest,
        CreatePostRequest,
        UpdatePostRequest,
        CreateCommentRequest,
        UpdateCommentRequest,
    )),
    tags(
        (name = "auth", description = "Registration, sign-in and password recovery"),
        (name = "users", description = "Profiles and follows"),
        (name = "trips", description = "The caller's trip plans"),
        (name = "destinations", description = "Destination catalogue"),
        (name = "activities", description = "Activities and ratings"),
        (name = "bookings", description = "The caller's bookings"),
        (name = "posts", description = "Community posts, feed and likes"),
        (name = "comments", description = "Comments on posts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
