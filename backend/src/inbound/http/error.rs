//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting handlers return
//! it directly. Extractor failures (malformed JSON bodies, path segments and
//! query strings) are converted into the same envelope so clients only ever
//! see `{ "code", "error", "traceId", "details" }`.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(self)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// JSON extractor configuration rejecting malformed bodies with a 400
/// envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        warn!(error = %err, "rejected request body");
        Error::invalid_request("Invalid JSON body")
            .with_details(json!({ "code": "invalid_json", "reason": err.to_string() }))
            .into()
    })
}

/// Path extractor configuration rejecting malformed segments with a 400
/// envelope.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req: &HttpRequest| {
        Error::invalid_request("Invalid path parameter")
            .with_details(json!({
                "code": "invalid_path",
                "path": req.path(),
                "reason": err.to_string(),
            }))
            .into()
    })
}

/// Query extractor configuration rejecting malformed parameters with a
/// 400 envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        Error::invalid_request("Invalid query parameters")
            .with_details(json!({ "code": "invalid_query", "reason": err.to_string() }))
            .into()
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("Not Found"))
}

#[cfg(test)]
mod tests;
