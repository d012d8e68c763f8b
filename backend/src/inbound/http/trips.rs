//! Trip planning HTTP handlers. Every route requires a signed-in caller.
//!
//! ```text
//! POST /api/trips {"destination_id":"…","start_date":"2026-06-01","end_date":"2026-06-10"}
//! GET /api/trips
//! GET /api/trips/{id}
//! PUT /api/trips/{id} {"budget":1800}
//! DELETE /api/trips/{id}
//! ```

use actix_web::{HttpResponse, Scope, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Trip, TripChanges, TripDetail, TripDraft, TripListing};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, MessageSchema, TripSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, Numeric, parse_date, parse_optional_date, parse_optional_number,
    parse_optional_uuid, parse_uuid, present,
};

const DESTINATION_ID: FieldName = FieldName::new("destination_id");
const START_DATE: FieldName = FieldName::new("start_date");
const END_DATE: FieldName = FieldName::new("end_date");
const BUDGET: FieldName = FieldName::new("budget");

/// Request body for `POST /api/trips`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateTripRequest {
    /// Destination id.
    #[schema(format = Uuid)]
    pub destination_id: Option<String>,
    /// Departure, `YYYY-MM-DD` or RFC 3339.
    pub start_date: Option<String>,
    /// Return, `YYYY-MM-DD` or RFC 3339.
    pub end_date: Option<String>,
    /// Planned spend, 0 when omitted.
    #[schema(value_type = Option<f64>)]
    pub budget: Option<Numeric>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Visibility, private when omitted.
    pub is_public: Option<bool>,
}

impl TryFrom<CreateTripRequest> for TripDraft {
    type Error = Error;

    fn try_from(value: CreateTripRequest) -> Result<Self, Self::Error> {
        let (Some(destination_id), Some(start_date), Some(end_date)) = (
            present(value.destination_id),
            present(value.start_date),
            present(value.end_date),
        ) else {
            return Err(Error::invalid_request(
                "Missing required fields: destination_id, start_date, and end_date are required",
            ));
        };
        Ok(Self {
            destination_id: parse_uuid(&destination_id, DESTINATION_ID)?,
            start_date: parse_date(&start_date, START_DATE)?,
            end_date: parse_date(&end_date, END_DATE)?,
            budget: parse_optional_number(value.budget, BUDGET)?,
            notes: value.notes,
            is_public: value.is_public,
        })
    }
}

/// Request body for `PUT /api/trips/{id}`.
///
/// Blank ids and dates leave the stored value alone.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateTripRequest {
    /// New destination.
    #[schema(format = Uuid)]
    pub destination_id: Option<String>,
    /// New departure.
    pub start_date: Option<String>,
    /// New return.
    pub end_date: Option<String>,
    /// New budget.
    #[schema(value_type = Option<f64>)]
    pub budget: Option<Numeric>,
    /// New notes.
    pub notes: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
}

impl TryFrom<UpdateTripRequest> for TripChanges {
    type Error = Error;

    fn try_from(value: UpdateTripRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            destination_id: parse_optional_uuid(value.destination_id, DESTINATION_ID)?,
            start_date: parse_optional_date(value.start_date, START_DATE)?,
            end_date: parse_optional_date(value.end_date, END_DATE)?,
            budget: parse_optional_number(value.budget, BUDGET)?,
            notes: value.notes,
            is_public: value.is_public,
            updated_at: None,
        })
    }
}

/// Routes under `/trips`.
pub fn scope() -> Scope {
    web::scope("/trips")
        .service(create_trip)
        .service(list_trips)
        .service(get_trip)
        .service(update_trip)
        .service(delete_trip)
}

/// Plan a trip.
#[utoipa::path(
    post,
    path = "/api/trips",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created", body = TripSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "createTrip"
)]
#[post("")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    payload: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TripDraft::try_from(payload.into_inner())?;
    let trip = state.trips.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(trip))
}

/// Trips the caller owns plus public ones, earliest departure first.
#[utoipa::path(
    get,
    path = "/api/trips",
    responses(
        (status = 200, description = "Visible trips", body = [TripSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "listTrips"
)]
#[get("")]
pub async fn list_trips(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
) -> ApiResult<web::Json<Vec<TripListing>>> {
    state.trips.list(&caller).await.map(web::Json)
}

/// A visible trip with its destination, bookings and booked activities.
#[utoipa::path(
    get,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip id", format = Uuid)),
    responses(
        (status = 200, description = "Trip detail", body = TripSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not visible or missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "getTrip"
)]
#[get("/{id}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<TripDetail>> {
    state
        .trips
        .detail(&caller, path.into_inner())
        .await
        .map(web::Json)
}

/// Partially update one of the caller's trips.
#[utoipa::path(
    put,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip id", format = Uuid)),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Updated trip", body = TripSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not owned or missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "updateTrip"
)]
#[put("/{id}")]
pub async fn update_trip(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateTripRequest>,
) -> ApiResult<web::Json<Trip>> {
    let changes = TripChanges::try_from(payload.into_inner())?;
    state
        .trips
        .update(&caller, path.into_inner(), changes)
        .await
        .map(web::Json)
}

/// Delete one of the caller's trips.
#[utoipa::path(
    delete,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip id", format = Uuid)),
    responses(
        (status = 200, description = "Trip deleted", body = MessageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not owned or missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "deleteTrip"
)]
#[delete("/{id}")]
pub async fn delete_trip(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.trips.delete(&caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Trip deleted successfully" })))
}
