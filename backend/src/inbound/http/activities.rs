//! Activity catalogue and rating HTTP handlers.
//!
//! ```text
//! GET /api/activities?destination_id=…&min_price=10&max_price=90
//! GET /api/activities/types
//! GET /api/activities/{id}
//! POST /api/activities {"destination_id":"…","type_id":"…","name":"Night market","location":"Old town"}
//! POST /api/activities/{id}/rate {"rating":4,"review":"Worth it"}
//! ```

use actix_web::{HttpResponse, Scope, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    ActivityDetail, ActivityDraft, ActivityFilter, ActivityListing, ActivityRating, ActivityType,
    DEFAULT_PAGE_LIMIT, Error, Page, RatingScore,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Authenticated;
use crate::inbound::http::schemas::{
    ActivityPageSchema, ActivityRatingSchema, ActivitySchema, CategoryTypeSchema, ErrorSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, Numeric, page_request, parse_number, parse_optional_number, parse_uuid, present,
};

const INVALID_RATING: &str = "Rating is required and must be between 1 and 5";

/// Query parameters for `GET /api/activities`.
#[derive(Debug, Default, Deserialize)]
pub struct ListActivitiesQuery {
    /// Restrict to one destination.
    pub destination_id: Option<Uuid>,
    /// Restrict to one category.
    pub type_id: Option<Uuid>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Page size.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// Request body for `POST /api/activities`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateActivityRequest {
    /// Destination offering it.
    #[schema(format = Uuid)]
    pub destination_id: Option<String>,
    /// Category.
    #[schema(format = Uuid)]
    pub type_id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Venue.
    pub location: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Price.
    #[schema(value_type = Option<f64>)]
    pub price: Option<Numeric>,
    /// Currency, `USD` when omitted.
    pub currency: Option<String>,
    /// Duration in hours.
    #[schema(value_type = Option<f64>)]
    pub duration_hours: Option<Numeric>,
    /// Gallery.
    pub image_urls: Option<Vec<String>>,
    /// Visibility, public when omitted.
    pub is_public: Option<bool>,
}

impl TryFrom<CreateActivityRequest> for ActivityDraft {
    type Error = Error;

    fn try_from(value: CreateActivityRequest) -> Result<Self, Self::Error> {
        let (Some(destination_id), Some(type_id), Some(name), Some(location)) = (
            present(value.destination_id),
            present(value.type_id),
            present(value.name),
            present(value.location),
        ) else {
            return Err(Error::invalid_request(
                "Missing required fields: destination_id, type_id, name, and location are required",
            ));
        };
        Ok(Self {
            destination_id: parse_uuid(&destination_id, FieldName::new("destination_id"))?,
            type_id: parse_uuid(&type_id, FieldName::new("type_id"))?,
            name,
            location,
            description: value.description,
            price: parse_optional_number(value.price, FieldName::new("price"))?,
            currency: value.currency,
            duration_hours: parse_optional_number(
                value.duration_hours,
                FieldName::new("duration_hours"),
            )?,
            image_urls: value.image_urls,
            is_public: value.is_public,
        })
    }
}

/// Request body for `POST /api/activities/{id}/rate`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RateActivityRequest {
    /// Score between 1 and 5.
    #[schema(value_type = f64, minimum = 1, maximum = 5)]
    pub rating: Option<Numeric>,
    /// Review text.
    pub review: Option<String>,
}

fn rating_score(raw: Option<Numeric>) -> Result<RatingScore, Error> {
    raw.and_then(|value| parse_number(value, FieldName::new("rating")).ok())
        .and_then(RatingScore::new)
        .ok_or_else(|| Error::invalid_request(INVALID_RATING))
}

/// Routes under `/activities`. `types` precedes `{id}`.
pub fn scope() -> Scope {
    web::scope("/activities")
        .service(list_activities)
        .service(activity_types)
        .service(get_activity)
        .service(create_activity)
        .service(rate_activity)
}

/// Filtered, paginated activities, newest first.
#[utoipa::path(
    get,
    path = "/api/activities",
    params(
        ("destination_id" = Option<String>, Query, description = "Destination id", format = Uuid),
        ("type_id" = Option<String>, Query, description = "Activity type id", format = Uuid),
        ("min_price" = Option<f64>, Query, description = "Inclusive lower price bound"),
        ("max_price" = Option<f64>, Query, description = "Inclusive upper price bound"),
        ("limit" = Option<u32>, Query, description = "Page size, default 20, max 100"),
        ("offset" = Option<u32>, Query, description = "Rows to skip, default 0")
    ),
    responses(
        (status = 200, description = "Activities", body = ActivityPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "listActivities",
    security([])
)]
#[get("")]
pub async fn list_activities(
    state: web::Data<HttpState>,
    query: web::Query<ListActivitiesQuery>,
) -> ApiResult<web::Json<Page<ActivityListing>>> {
    let query = query.into_inner();
    let page = page_request(query.limit, query.offset, DEFAULT_PAGE_LIMIT)?;
    let filter = ActivityFilter {
        destination_id: query.destination_id,
        type_id: query.type_id,
        min_price: query.min_price,
        max_price: query.max_price,
    };
    state.activities.list(&filter, page).await.map(web::Json)
}

/// Every activity type, by name.
#[utoipa::path(
    get,
    path = "/api/activities/types",
    responses(
        (status = 200, description = "Activity types", body = [CategoryTypeSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "activityTypes",
    security([])
)]
#[get("/types")]
pub async fn activity_types(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ActivityType>>> {
    state.activities.types().await.map(web::Json)
}

/// An activity with its type, destination and ratings.
#[utoipa::path(
    get,
    path = "/api/activities/{id}",
    params(("id" = String, Path, description = "Activity id", format = Uuid)),
    responses(
        (status = 200, description = "Activity detail", body = ActivitySchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown activity", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "getActivity",
    security([])
)]
#[get("/{id}")]
pub async fn get_activity(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ActivityDetail>> {
    state
        .activities
        .detail(path.into_inner())
        .await
        .map(web::Json)
}

/// List a new activity.
#[utoipa::path(
    post,
    path = "/api/activities",
    request_body = CreateActivityRequest,
    responses(
        (status = 201, description = "Activity created", body = ActivitySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "createActivity"
)]
#[post("")]
pub async fn create_activity(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    payload: web::Json<CreateActivityRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ActivityDraft::try_from(payload.into_inner())?;
    let activity = state.activities.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(activity))
}

/// Rate an activity and refresh its average.
#[utoipa::path(
    post,
    path = "/api/activities/{id}/rate",
    params(("id" = String, Path, description = "Activity id", format = Uuid)),
    request_body = RateActivityRequest,
    responses(
        (status = 200, description = "The caller's rating", body = ActivityRatingSchema),
        (status = 400, description = "Rating out of range", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown activity", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "rateActivity"
)]
#[post("/{id}/rate")]
pub async fn rate_activity(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<RateActivityRequest>,
) -> ApiResult<web::Json<ActivityRating>> {
    let RateActivityRequest { rating, review } = payload.into_inner();
    let score = rating_score(rating)?;
    state
        .activities
        .rate(&caller, path.into_inner(), score, review)
        .await
        .map(web::Json)
}

#[cfg(test)]
mod tests;
