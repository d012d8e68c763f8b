//! Booking HTTP handlers. Every route requires a signed-in caller, and
//! bookings are only visible to their owner.
//!
//! ```text
//! GET /api/bookings?status=confirmed
//! GET /api/bookings/types
//! GET /api/bookings/{id}
//! POST /api/bookings {"trip_id":"…","type_id":"…","booking_date":"2026-05-01","amount":240}
//! PUT /api/bookings/{id} {"notes":null}
//! DELETE /api/bookings/{id}
//! ```

use actix_web::{HttpResponse, Scope, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::patch::double_option;
use crate::domain::{
    Booking, BookingChanges, BookingDraft, BookingFilter, BookingType, BookingView,
    DEFAULT_PAGE_LIMIT, Error, Page,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Authenticated;
use crate::inbound::http::schemas::{
    BookingPageSchema, BookingSchema, CategoryTypeSchema, ErrorSchema, MessageSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, Numeric, page_request, parse_date, parse_number, parse_optional_date,
    parse_optional_number, parse_optional_uuid, parse_uuid, present,
};

const TRIP_ID: FieldName = FieldName::new("trip_id");
const TYPE_ID: FieldName = FieldName::new("type_id");
const ACTIVITY_ID: FieldName = FieldName::new("activity_id");
const BOOKING_DATE: FieldName = FieldName::new("booking_date");
const START_DATE: FieldName = FieldName::new("start_date");
const END_DATE: FieldName = FieldName::new("end_date");
const AMOUNT: FieldName = FieldName::new("amount");

/// Query parameters for `GET /api/bookings`.
#[derive(Debug, Default, Deserialize)]
pub struct ListBookingsQuery {
    /// Exact status match.
    pub status: Option<String>,
    /// Restrict to one category.
    pub type_id: Option<Uuid>,
    /// Page size.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// Request body for `POST /api/bookings`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Trip, which the caller must own.
    #[schema(format = Uuid)]
    pub trip_id: Option<String>,
    /// Category.
    #[schema(format = Uuid)]
    pub type_id: Option<String>,
    /// When booked, `YYYY-MM-DD` or RFC 3339.
    pub booking_date: Option<String>,
    /// Amount paid; zero is a valid amount.
    #[schema(value_type = f64)]
    pub amount: Option<Numeric>,
    /// Booked activity.
    #[schema(format = Uuid)]
    pub activity_id: Option<String>,
    /// Provider.
    pub provider_name: Option<String>,
    /// Confirmation code.
    pub booking_reference: Option<String>,
    /// Service start.
    pub start_date: Option<String>,
    /// Service end.
    pub end_date: Option<String>,
    /// Currency, `USD` when omitted.
    pub currency: Option<String>,
    /// Status, `confirmed` when omitted.
    pub status: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

impl TryFrom<CreateBookingRequest> for BookingDraft {
    type Error = Error;

    fn try_from(value: CreateBookingRequest) -> Result<Self, Self::Error> {
        let amount = value
            .amount
            .filter(|amount| !matches!(amount, Numeric::Text(text) if text.trim().is_empty()));
        let (Some(trip_id), Some(type_id), Some(booking_date), Some(amount)) = (
            present(value.trip_id),
            present(value.type_id),
            present(value.booking_date),
            amount,
        ) else {
            return Err(Error::invalid_request(
                "Missing required fields: trip_id, type_id, booking_date, and amount are required",
            ));
        };
        Ok(Self {
            trip_id: parse_uuid(&trip_id, TRIP_ID)?,
            type_id: parse_uuid(&type_id, TYPE_ID)?,
            booking_date: parse_date(&booking_date, BOOKING_DATE)?,
            amount: parse_number(amount, AMOUNT)?,
            activity_id: parse_optional_uuid(value.activity_id, ACTIVITY_ID)?,
            provider_name: present(value.provider_name),
            booking_reference: present(value.booking_reference),
            start_date: parse_optional_date(value.start_date, START_DATE)?,
            end_date: parse_optional_date(value.end_date, END_DATE)?,
            currency: value.currency,
            status: value.status,
            notes: value.notes,
        })
    }
}

/// Request body for `PUT /api/bookings/{id}`.
///
/// Blank `trip_id`, `type_id`, `booking_date`, `currency` and `status`
/// leave the stored value alone. The nullable fields clear on `null`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateBookingRequest {
    /// Move to another trip.
    #[schema(format = Uuid)]
    pub trip_id: Option<String>,
    /// Change category.
    #[schema(format = Uuid)]
    pub type_id: Option<String>,
    /// New booking date.
    pub booking_date: Option<String>,
    /// New amount.
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Numeric>,
    /// New currency.
    pub currency: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// Booked activity, or `null` to detach it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub activity_id: Option<Option<String>>,
    /// Provider, or `null` (or a blank string) to clear it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub provider_name: Option<Option<String>>,
    /// Confirmation code, or `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub booking_reference: Option<Option<String>>,
    /// Service start, or `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub start_date: Option<Option<String>>,
    /// Service end, or `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<String>>,
    /// Notes, or `null` (or a blank string) to clear them.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

/// Parse a tri-state field whose value needs conversion. Blank strings clear
/// the column, like `null`.
fn parse_tri_state<T>(
    value: Option<Option<String>>,
    parse: impl FnOnce(&str) -> Result<T, Error>,
) -> Result<Option<Option<T>>, Error> {
    match value {
        None => Ok(None),
        Some(inner) => present(inner)
            .map(|raw| parse(&raw))
            .transpose()
            .map(Some),
    }
}

impl TryFrom<UpdateBookingRequest> for BookingChanges {
    type Error = Error;

    fn try_from(value: UpdateBookingRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            trip_id: parse_optional_uuid(value.trip_id, TRIP_ID)?,
            type_id: parse_optional_uuid(value.type_id, TYPE_ID)?,
            activity_id: parse_tri_state(value.activity_id, |raw| parse_uuid(raw, ACTIVITY_ID))?,
            provider_name: value.provider_name.map(present),
            booking_reference: value.booking_reference.map(present),
            booking_date: parse_optional_date(value.booking_date, BOOKING_DATE)?,
            start_date: parse_tri_state(value.start_date, |raw| parse_date(raw, START_DATE))?,
            end_date: parse_tri_state(value.end_date, |raw| parse_date(raw, END_DATE))?,
            amount: parse_optional_number(value.amount, AMOUNT)?,
            currency: value.currency,
            status: value.status,
            notes: value.notes.map(present),
            updated_at: None,
        })
    }
}

/// Routes under `/bookings`. `types` precedes `{id}`.
pub fn scope() -> Scope {
    web::scope("/bookings")
        .service(list_bookings)
        .service(booking_types)
        .service(get_booking)
        .service(create_booking)
        .service(update_booking)
        .service(delete_booking)
}

/// The caller's bookings, latest booking date first.
#[utoipa::path(
    get,
    path = "/api/bookings",
    params(
        ("status" = Option<String>, Query, description = "Exact status"),
        ("type_id" = Option<String>, Query, description = "Booking type id", format = Uuid),
        ("limit" = Option<u32>, Query, description = "Page size, default 20, max 100"),
        ("offset" = Option<u32>, Query, description = "Rows to skip, default 0")
    ),
    responses(
        (status = 200, description = "Own bookings", body = BookingPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    query: web::Query<ListBookingsQuery>,
) -> ApiResult<web::Json<Page<BookingView>>> {
    let query = query.into_inner();
    let page = page_request(query.limit, query.offset, DEFAULT_PAGE_LIMIT)?;
    let filter = BookingFilter {
        status: present(query.status),
        type_id: query.type_id,
    };
    state
        .bookings
        .list(&caller, &filter, page)
        .await
        .map(web::Json)
}

/// Every booking type, by name.
#[utoipa::path(
    get,
    path = "/api/bookings/types",
    responses(
        (status = 200, description = "Booking types", body = [CategoryTypeSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "bookingTypes"
)]
#[get("/types")]
pub async fn booking_types(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
) -> ApiResult<web::Json<Vec<BookingType>>> {
    state.bookings.types(&caller).await.map(web::Json)
}

/// One of the caller's bookings.
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(("id" = String, Path, description = "Booking id", format = Uuid)),
    responses(
        (status = 200, description = "Booking detail", body = BookingSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not owned or missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<BookingView>> {
    state
        .bookings
        .detail(&caller, path.into_inner())
        .await
        .map(web::Json)
}

/// Book against one of the caller's trips.
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Trip not owned or missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<HttpResponse> {
    let draft = BookingDraft::try_from(payload.into_inner())?;
    let booking = state.bookings.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(booking))
}

/// Partially update one of the caller's bookings.
#[utoipa::path(
    put,
    path = "/api/bookings/{id}",
    params(("id" = String, Path, description = "Booking id", format = Uuid)),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = BookingSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not owned or missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBooking"
)]
#[put("/{id}")]
pub async fn update_booking(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateBookingRequest>,
) -> ApiResult<web::Json<Booking>> {
    let changes = BookingChanges::try_from(payload.into_inner())?;
    state
        .bookings
        .update(&caller, path.into_inner(), changes)
        .await
        .map(web::Json)
}

/// Cancel and remove one of the caller's bookings.
#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    params(("id" = String, Path, description = "Booking id", format = Uuid)),
    responses(
        (status = 200, description = "Booking deleted", body = MessageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not owned or missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "deleteBooking"
)]
#[delete("/{id}")]
pub async fn delete_booking(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.bookings.delete(&caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Booking deleted successfully" })))
}

#[cfg(test)]
mod tests;
