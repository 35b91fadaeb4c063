//! Extractors whose rejections use the API envelope.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use emenu_core::MenuQuery;
use emenu_shared::Pagination;

use crate::error::ApiError;

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "page_size";

/// JSON body; malformed or incomplete bodies become 400.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| {
                let message = e.body_text();
                let field = match e {
                    JsonRejection::JsonDataError(_) => rejected_field(&message).map(str::to_string),
                    _ => None,
                };
                ApiError::validation(message, field.as_deref())
            })?;
        Ok(Self(value))
    }
}

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Top-level body field named by a deserialization error, e.g. `price` for
/// `price: invalid value ...` or `missing field `name``.
fn rejected_field(message: &str) -> Option<&str> {
    let detail = message.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(message);
    if let Some(rest) = detail.strip_prefix("missing field `") {
        return rest.split('`').next().filter(|f| !f.is_empty());
    }
    let (path, _) = detail.split_once(": ")?;
    if path.is_empty() || path.contains(char::is_whitespace) {
        return None;
    }
    path.split(['.', '[']).next().filter(|f| !f.is_empty() && *f != "?")
}

/// Numeric `{id}` segment; anything else is an unknown resource.
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::NotFound(e.body_text()))?;
        Ok(Self(id))
    }
}

/// Raw query pairs in request order, repeated keys preserved.
pub struct QueryPairs(pub Vec<(String, String)>);

impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text(), None))?;
        Ok(Self(pairs))
    }
}

impl QueryPairs {
    fn last(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// `None` when no `page` was requested.
    pub fn pagination(&self) -> Result<Option<Pagination>, ApiError> {
        let Some(page) = self.last(PAGE_PARAM) else {
            return Ok(None);
        };
        let page: u32 = page
            .parse()
            .map_err(|_| ApiError::validation("Invalid page number", Some(PAGE_PARAM)))?;
        let per_page = self
            .last(PAGE_SIZE_PARAM)
            .map(|size| {
                size.parse::<u32>()
                    .map_err(|_| ApiError::validation("Invalid page size", Some(PAGE_SIZE_PARAM)))
            })
            .transpose()?;
        Ok(Some(Pagination::new(page, per_page)))
    }

    pub fn menu_query(&self) -> Result<MenuQuery, ApiError> {
        MenuQuery::from_pairs(self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .map_err(|e| ApiError::from(emenu_core::DomainError::from(e)))
    }
}
