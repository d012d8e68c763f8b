//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies arrive as loosely typed DTOs (strings for identifiers and
//! dates, numbers or numeric strings for amounts). These helpers turn them
//! into domain values and describe failures with `{ field, code, value }`
//! details.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, PageRequest, PageRequestError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidDate,
    InvalidNumber,
    InvalidPagination,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidPagination => "invalid_pagination",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// A JSON number, or a string holding one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum Numeric {
    /// Plain JSON number.
    Number(f64),
    /// Numeric text such as `"12.50"`.
    Text(String),
}

/// Treat absent and blank strings alike.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        invalid(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_optional_uuid(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<Uuid>, Error> {
    present(value)
        .map(|raw| parse_uuid(&raw, field))
        .transpose()
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let raw = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            invalid(
                field,
                ErrorCode::InvalidDate,
                format!("{} must be a date (YYYY-MM-DD) or RFC 3339 timestamp", field.as_str()),
                value,
            )
        })
}

pub(crate) fn parse_optional_date(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    present(value)
        .map(|raw| parse_date(&raw, field))
        .transpose()
}

pub(crate) fn parse_number(value: Numeric, field: FieldName) -> Result<f64, Error> {
    let parsed = match &value {
        Numeric::Number(number) => Some(*number),
        Numeric::Text(text) => text.trim().parse::<f64>().ok(),
    };
    parsed.filter(|number| number.is_finite()).ok_or_else(|| {
        let shown = match value {
            Numeric::Number(number) => number.to_string(),
            Numeric::Text(text) => text,
        };
        invalid(
            field,
            ErrorCode::InvalidNumber,
            format!("{} must be a number", field.as_str()),
            &shown,
        )
    })
}

/// Absent, `null` and `""` count as no value.
pub(crate) fn parse_optional_number(
    value: Option<Numeric>,
    field: FieldName,
) -> Result<Option<f64>, Error> {
    match value {
        None => Ok(None),
        Some(Numeric::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(number) => parse_number(number, field).map(Some),
    }
}

/// Validate `limit`/`offset` query parameters against `default_limit`.
pub(crate) fn page_request(
    limit: Option<u32>,
    offset: Option<u32>,
    default_limit: u32,
) -> Result<PageRequest, Error> {
    PageRequest::with_default_limit(limit, offset, default_limit).map_err(|err: PageRequestError| {
        let shown = limit.map(|value| value.to_string()).unwrap_or_default();
        invalid(
            FieldName::new("limit"),
            ErrorCode::InvalidPagination,
            err.to_string(),
            &shown,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::Value;

    const FIELD: FieldName = FieldName::new("start_date");

    #[rstest]
    #[case("2025-06-01", Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single())]
    #[case("2025-06-01T10:30:00+02:00", Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).single())]
    fn dates_accept_plain_days_and_timestamps(
        #[case] raw: &str,
        #[case] expected: Option<DateTime<Utc>>,
    ) {
        assert_eq!(parse_date(raw, FIELD).ok(), expected);
    }

    #[rstest]
    fn malformed_dates_report_the_field() {
        let err = parse_date("next tuesday", FIELD).expect_err("invalid date");
        let details = err.details().expect("details attached");
        assert_eq!(details["field"], "start_date");
        assert_eq!(details["code"], "invalid_date");
        assert_eq!(details["value"], "next tuesday");
    }

    #[rstest]
    #[case(Numeric::Number(12.5), Some(12.5))]
    #[case(Numeric::Text(" 40 ".to_owned()), Some(40.0))]
    #[case(Numeric::Text("forty".to_owned()), None)]
    fn numbers_accept_numeric_text(#[case] input: Numeric, #[case] expected: Option<f64>) {
        assert_eq!(parse_number(input, FieldName::new("amount")).ok(), expected);
    }

    #[rstest]
    fn blank_optional_numbers_are_absent() {
        let parsed = parse_optional_number(Some(Numeric::Text(String::new())), FieldName::new("price"))
            .expect("blank is absent");
        assert_eq!(parsed, None);
    }

    #[rstest]
    fn malformed_uuid_reports_value() {
        let err = parse_uuid("abc", FieldName::new("trip_id")).expect_err("invalid uuid");
        assert_eq!(err.message(), "trip_id must be a valid UUID");
        assert_eq!(
            err.details().and_then(|d| d.get("code")).and_then(Value::as_str),
            Some("invalid_uuid")
        );
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(500))]
    fn out_of_range_limits_are_rejected(#[case] limit: Option<u32>) {
        let err = page_request(limit, None, 20).expect_err("invalid limit");
        assert_eq!(
            err.details().and_then(|d| d.get("code")).and_then(Value::as_str),
            Some("invalid_pagination")
        );
    }

    #[rstest]
    fn absent_limit_uses_endpoint_default() {
        let page = page_request(None, Some(5), 10).expect("valid");
        assert_eq!((page.limit(), page.offset()), (10, 5));
    }
}
