//! Destination catalogue HTTP handlers.
//!
//! ```text
//! GET /api/destinations?country=jap&min_rating=4&limit=20&offset=0
//! GET /api/destinations/popular?limit=5
//! GET /api/destinations/search?q=kyo
//! GET /api/destinations/{id}
//! POST /api/destinations {"name":"Kyoto","country":"Japan"}
//! ```

use actix_web::{HttpResponse, Scope, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    DEFAULT_PAGE_LIMIT, DEFAULT_SHORTLIST_LIMIT, Destination, DestinationDetail, DestinationDraft,
    DestinationFilter, Error, Page,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Authenticated;
use crate::inbound::http::schemas::{DestinationPageSchema, DestinationSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, Numeric, page_request, parse_optional_number, present,
};

/// Query parameters for `GET /api/destinations`.
#[derive(Debug, Default, Deserialize)]
pub struct ListDestinationsQuery {
    /// Case-insensitive country substring.
    pub country: Option<String>,
    /// Minimum average rating.
    pub min_rating: Option<f64>,
    /// Page size.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// Query parameters for `GET /api/destinations/popular`.
#[derive(Debug, Default, Deserialize)]
pub struct PopularQuery {
    /// Number of destinations.
    pub limit: Option<u32>,
}

/// Query parameters for `GET /api/destinations/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Search text.
    pub q: Option<String>,
    /// Number of matches.
    pub limit: Option<u32>,
}

/// Request body for `POST /api/destinations`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateDestinationRequest {
    /// Place name.
    pub name: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Hero image URL.
    pub image_url: Option<String>,
    /// Seasonal advice.
    pub best_time_to_visit: Option<String>,
    /// Typical daily spend.
    #[schema(value_type = Option<f64>)]
    pub average_cost_per_day: Option<Numeric>,
    /// Currency, `USD` when omitted.
    pub currency: Option<String>,
    /// IANA timezone.
    pub timezone: Option<String>,
    /// Main language.
    pub language: Option<String>,
    /// Visa notes.
    pub visa_requirements: Option<String>,
    /// Safety score.
    #[schema(value_type = Option<f64>)]
    pub safety_rating: Option<Numeric>,
}

impl TryFrom<CreateDestinationRequest> for DestinationDraft {
    type Error = Error;

    fn try_from(value: CreateDestinationRequest) -> Result<Self, Self::Error> {
        let (Some(name), Some(country)) = (present(value.name), present(value.country)) else {
            return Err(Error::invalid_request(
                "Missing required fields: name and country are required",
            ));
        };
        Ok(Self {
            name,
            country,
            description: value.description,
            image_url: value.image_url,
            best_time_to_visit: value.best_time_to_visit,
            average_cost_per_day: parse_optional_number(
                value.average_cost_per_day,
                FieldName::new("average_cost_per_day"),
            )?,
            currency: value.currency,
            timezone: value.timezone,
            language: value.language,
            visa_requirements: value.visa_requirements,
            safety_rating: parse_optional_number(
                value.safety_rating,
                FieldName::new("safety_rating"),
            )?,
        })
    }
}

/// Routes under `/destinations`. Named routes precede `{id}`.
pub fn scope() -> Scope {
    web::scope("/destinations")
        .service(list_destinations)
        .service(popular_destinations)
        .service(search_destinations)
        .service(get_destination)
        .service(create_destination)
}

/// Filtered, paginated destinations.
#[utoipa::path(
    get,
    path = "/api/destinations",
    params(
        ("country" = Option<String>, Query, description = "Case-insensitive country substring"),
        ("min_rating" = Option<f64>, Query, description = "Minimum average rating"),
        ("limit" = Option<u32>, Query, description = "Page size, default 20, max 100"),
        ("offset" = Option<u32>, Query, description = "Rows to skip, default 0")
    ),
    responses(
        (status = 200, description = "Destinations", body = DestinationPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["destinations"],
    operation_id = "listDestinations",
    security([])
)]
#[get("")]
pub async fn list_destinations(
    state: web::Data<HttpState>,
    query: web::Query<ListDestinationsQuery>,
) -> ApiResult<web::Json<Page<Destination>>> {
    let query = query.into_inner();
    let page = page_request(query.limit, query.offset, DEFAULT_PAGE_LIMIT)?;
    let filter = DestinationFilter {
        country: present(query.country),
        min_rating: query.min_rating,
    };
    state.destinations.list(&filter, page).await.map(web::Json)
}

/// Destinations with the most planned trips.
#[utoipa::path(
    get,
    path = "/api/destinations/popular",
    params(("limit" = Option<u32>, Query, description = "Number of destinations, default 10")),
    responses(
        (status = 200, description = "Most planned destinations", body = [DestinationSchema]),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["destinations"],
    operation_id = "popularDestinations",
    security([])
)]
#[get("/popular")]
pub async fn popular_destinations(
    state: web::Data<HttpState>,
    query: web::Query<PopularQuery>,
) -> ApiResult<web::Json<Vec<Destination>>> {
    let page = page_request(query.limit, None, DEFAULT_SHORTLIST_LIMIT)?;
    state
        .destinations
        .popular(page.limit())
        .await
        .map(web::Json)
}

/// Name or country search.
#[utoipa::path(
    get,
    path = "/api/destinations/search",
    params(
        ("q" = String, Query, description = "Search text"),
        ("limit" = Option<u32>, Query, description = "Number of matches, default 10")
    ),
    responses(
        (status = 200, description = "Matching destinations", body = [DestinationSchema]),
        (status = 400, description = "Missing search text", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["destinations"],
    operation_id = "searchDestinations",
    security([])
)]
#[get("/search")]
pub async fn search_destinations(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<Destination>>> {
    let SearchQuery { q, limit } = query.into_inner();
    let q = present(q).ok_or_else(|| Error::invalid_request("Search query is required"))?;
    let page = page_request(limit, None, DEFAULT_SHORTLIST_LIMIT)?;
    state
        .destinations
        .search(&q, page.limit())
        .await
        .map(web::Json)
}

/// A destination with its activities and the trips planned there.
#[utoipa::path(
    get,
    path = "/api/destinations/{id}",
    params(("id" = String, Path, description = "Destination id", format = Uuid)),
    responses(
        (status = 200, description = "Destination detail", body = DestinationSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown destination", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["destinations"],
    operation_id = "getDestination",
    security([])
)]
#[get("/{id}")]
pub async fn get_destination(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<DestinationDetail>> {
    state
        .destinations
        .detail(path.into_inner())
        .await
        .map(web::Json)
}

/// Contribute a destination.
#[utoipa::path(
    post,
    path = "/api/destinations",
    request_body = CreateDestinationRequest,
    responses(
        (status = 201, description = "Destination created", body = DestinationSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["destinations"],
    operation_id = "createDestination"
)]
#[post("")]
pub async fn create_destination(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    payload: web::Json<CreateDestinationRequest>,
) -> ApiResult<HttpResponse> {
    let draft = DestinationDraft::try_from(payload.into_inner())?;
    let destination = state.destinations.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(destination))
}

#[cfg(test)]
mod tests;
