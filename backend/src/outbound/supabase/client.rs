//! Reqwest plumbing shared by the auth and table adapters.
//!
//! Every request carries the project's `apikey` header and a bearer token:
//! the caller's access token when one is in scope, else the anon key.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_RANGE, HeaderMap};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use zeroize::Zeroizing;

use super::query::{Query, content_range_total};
use super::{SupabaseConfig, SupabaseSetupError};
use crate::domain::ports::BackendError;
use crate::domain::{AccessScope, AccessToken, Page, PageRequest};

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const COUNT_EXACT: &str = "count=exact";

/// Headers and body of a successful response.
pub(super) struct Reply {
    pub(super) headers: HeaderMap,
    pub(super) body: Vec<u8>,
}

impl Reply {
    pub(super) fn decode<T: DeserializeOwned>(&self) -> Result<T, BackendError> {
        serde_json::from_slice(&self.body).map_err(|error| {
            BackendError::decode(format!("unexpected response payload: {error}"))
        })
    }

    fn total(&self) -> Option<u64> {
        let header = self
            .headers
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok());
        content_range_total(header)
    }
}

pub(super) struct SupabaseClient {
    http: Client,
    rest_base: Url,
    auth_base: Url,
    anon_key: Zeroizing<String>,
}

impl SupabaseClient {
    pub(super) fn new(config: SupabaseConfig) -> Result<Self, SupabaseSetupError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        let root = with_trailing_slash(config.url);
        Ok(Self {
            http,
            rest_base: root.join("rest/v1/")?,
            auth_base: root.join("auth/v1/")?,
            anon_key: config.anon_key,
        })
    }

    fn request(&self, method: Method, url: Url, token: Option<&AccessToken>) -> RequestBuilder {
        let bearer = token.map_or(self.anon_key.as_str(), AccessToken::expose);
        self.http
            .request(method, url)
            .header("apikey", self.anon_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
            .header(ACCEPT, "application/json")
    }

    /// A request against a GoTrue endpoint such as `token` or `user`.
    pub(super) fn auth(
        &self,
        method: Method,
        path: &str,
        token: Option<&AccessToken>,
    ) -> Result<RequestBuilder, BackendError> {
        let url = self
            .auth_base
            .join(path)
            .map_err(|error| BackendError::transport(format!("invalid auth path {path}: {error}")))?;
        Ok(self.request(method, url, token))
    }

    fn table(
        &self,
        method: Method,
        table: &str,
        scope: &AccessScope,
        query: &Query,
    ) -> Result<RequestBuilder, BackendError> {
        let url = self
            .rest_base
            .join(table)
            .map_err(|error| BackendError::transport(format!("invalid table {table}: {error}")))?;
        Ok(self
            .request(method, url, scope.token())
            .query(&query.pairs()))
    }

    /// Send a request, mapping transport failures and non-2xx statuses.
    pub(super) async fn send(&self, request: RequestBuilder) -> Result<Reply, BackendError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(Reply {
            headers,
            body: body.to_vec(),
        })
    }

    /// Every row matching `query`.
    pub(super) async fn fetch<T: DeserializeOwned>(
        &self,
        scope: &AccessScope,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, BackendError> {
        let request = self.table(Method::GET, table, scope, query)?;
        self.send(request).await?.decode()
    }

    /// The first row matching `query`, if any.
    pub(super) async fn fetch_one<T: DeserializeOwned>(
        &self,
        scope: &AccessScope,
        table: &str,
        query: Query,
    ) -> Result<Option<T>, BackendError> {
        let rows: Vec<T> = self.fetch(scope, table, &query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// One window of rows plus the exact total reported by the store.
    pub(super) async fn fetch_page<T: DeserializeOwned>(
        &self,
        scope: &AccessScope,
        table: &str,
        query: Query,
        page: PageRequest,
    ) -> Result<Page<T>, BackendError> {
        let request = self
            .table(Method::GET, table, scope, &query.page(page))?
            .header(PREFER, COUNT_EXACT);
        let reply = self.send(request).await?;
        let rows: Vec<T> = reply.decode()?;
        let total = reply
            .total()
            .unwrap_or_else(|| u64::from(page.offset()) + rows.len() as u64);
        Ok(Page::new(rows, total, page))
    }

    /// Number of rows matching `query`.
    pub(super) async fn count(
        &self,
        scope: &AccessScope,
        table: &str,
        query: &Query,
    ) -> Result<u64, BackendError> {
        let request = self
            .table(Method::HEAD, table, scope, query)?
            .header(PREFER, COUNT_EXACT);
        self.send(request)
            .await?
            .total()
            .ok_or_else(|| BackendError::decode(format!("missing row count for {table}")))
    }

    /// Insert one row and return it, shaped by `select`.
    pub(super) async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        scope: &AccessScope,
        table: &str,
        body: &B,
        select: &str,
    ) -> Result<T, BackendError> {
        let request = self
            .table(Method::POST, table, scope, &Query::select(select))?
            .header(PREFER, RETURN_REPRESENTATION)
            .json(body);
        let rows: Vec<T> = self.send(request).await?.decode()?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::decode(format!("insert into {table} returned no row")))
    }

    /// Patch the rows matching `query` and return the first, if any.
    pub(super) async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        scope: &AccessScope,
        table: &str,
        query: &Query,
        body: &B,
    ) -> Result<Option<T>, BackendError> {
        let request = self
            .table(Method::PATCH, table, scope, query)?
            .header(PREFER, RETURN_REPRESENTATION)
            .json(body);
        let rows: Vec<T> = self.send(request).await?.decode()?;
        Ok(rows.into_iter().next())
    }

    /// Patch the rows matching `query` without reading them back.
    pub(super) async fn patch(
        &self,
        scope: &AccessScope,
        table: &str,
        query: &Query,
        body: &Value,
    ) -> Result<(), BackendError> {
        let request = self
            .table(Method::PATCH, table, scope, query)?
            .json(body);
        self.send(request).await.map(drop)
    }

    /// Delete the rows matching `query`.
    pub(super) async fn delete(
        &self,
        scope: &AccessScope,
        table: &str,
        query: &Query,
    ) -> Result<(), BackendError> {
        let request = self.table(Method::DELETE, table, scope, query)?;
        self.send(request).await.map(drop)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn map_transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::timeout(error.to_string())
    } else {
        BackendError::transport(error.to_string())
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> BackendError {
    let message = provider_message(body).unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {}", status.as_u16(), preview)
        }
    });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::unauthorized(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => BackendError::timeout(message),
        _ if status.is_client_error() => BackendError::rejected(message),
        _ => BackendError::transport(message),
    }
}

/// Human-readable message from a GoTrue or PostgREST error body.
fn provider_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["msg", "error_description", "message", "error"]
        .into_iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
