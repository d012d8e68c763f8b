//! Member profile HTTP handlers.
//!
//! ```text
//! GET /api/users/me
//! PUT /api/users/me {"name":"Ada","bio":null}
//! GET /api/users/me/trips
//! GET /api/users/me/posts
//! GET /api/users/{id}
//! POST /api/users/{id}/follow
//! ```

use actix_web::{HttpResponse, Scope, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::domain::patch::double_option;
use crate::domain::{PostView, ProfileChanges, PublicProfile, Trip, UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Authenticated;
use crate::inbound::http::schemas::{
    ErrorSchema, PostSchema, PublicProfileSchema, TripSchema, UserProfileSchema,
};
use crate::inbound::http::state::HttpState;

/// Request body for `PUT /api/users/me`.
///
/// Absent fields are left alone; `bio: null` clears the biography.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// New display name; blank values are ignored.
    pub name: Option<String>,
    /// New biography, or `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    /// New avatar URL; empty values are ignored.
    pub profile_picture: Option<String>,
    /// Replacement preferences document.
    #[schema(value_type = Option<Object>)]
    pub preferences: Option<Value>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            name: value.name,
            bio: value.bio,
            profile_picture: value.profile_picture,
            preferences: value.preferences,
            updated_at: None,
        }
    }
}

/// Response body for `POST /api/users/{id}/follow`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FollowResponse {
    /// Whether the caller follows the user afterwards.
    pub following: bool,
}

/// Routes under `/users`. The `me` routes precede `{id}`.
pub fn scope() -> Scope {
    web::scope("/users")
        .service(current_profile)
        .service(update_profile)
        .service(own_trips)
        .service(own_posts)
        .service(public_profile)
        .service(toggle_follow)
}

/// The caller's full profile row.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Own profile", body = UserProfileSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Profile missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentProfile"
)]
#[get("/me")]
pub async fn current_profile(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
) -> ApiResult<web::Json<UserProfile>> {
    state.profiles.own_profile(&caller).await.map(web::Json)
}

/// Update the caller's profile.
#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfileSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Profile missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    state
        .profiles
        .update_own_profile(&caller, payload.into_inner().into())
        .await
        .map(web::Json)
}

/// The caller's trips, earliest departure first.
#[utoipa::path(
    get,
    path = "/api/users/me/trips",
    responses(
        (status = 200, description = "Own trips", body = [TripSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "ownTrips"
)]
#[get("/me/trips")]
pub async fn own_trips(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
) -> ApiResult<web::Json<Vec<Trip>>> {
    state.profiles.own_trips(&caller).await.map(web::Json)
}

/// The caller's posts, newest first.
#[utoipa::path(
    get,
    path = "/api/users/me/posts",
    responses(
        (status = 200, description = "Own posts", body = [PostSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "ownPosts"
)]
#[get("/me/posts")]
pub async fn own_posts(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
) -> ApiResult<web::Json<Vec<PostView>>> {
    state.profiles.own_posts(&caller).await.map(web::Json)
}

/// Anyone's public profile.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id", format = Uuid)),
    responses(
        (status = 200, description = "Public profile", body = PublicProfileSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "publicProfile",
    security([])
)]
#[get("/{id}")]
pub async fn public_profile(
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<PublicProfile>> {
    state
        .profiles
        .public_profile(&path.into_inner())
        .await
        .map(web::Json)
}

/// Follow a member, or unfollow when already following.
#[utoipa::path(
    post,
    path = "/api/users/{id}/follow",
    params(("id" = String, Path, description = "User to follow", format = Uuid)),
    responses(
        (status = 200, description = "Follow state after the toggle", body = FollowResponse),
        (status = 400, description = "Following oneself", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "toggleFollow"
)]
#[post("/{id}/follow")]
pub async fn toggle_follow(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let following = state
        .profiles
        .toggle_follow(&caller, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "following": following })))
}
