use crate::error::BookError;
use crate::services::catalog::Catalog;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::{de, Deserialize, Deserializer};
use tracing::info;

/// Clients may keep a bestseller list for a day.
pub const BESTSELLERS_CACHE_CONTROL: &str = "max-age=86400, public";

const DEFAULT_BESTSELLERS_SIZE: i32 = 10;

fn default_size() -> i32 {
    DEFAULT_BESTSELLERS_SIZE
}

/// An empty `size=` counts as absent.
fn size_or_default<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
        return Ok(DEFAULT_BESTSELLERS_SIZE);
    }
    raw.parse().map_err(de::Error::custom)
}

#[derive(Debug, Deserialize)]
pub struct BestsellersParams {
    #[serde(default = "default_size", deserialize_with = "size_or_default")]
    pub size: i32,
}

pub async fn bestsellers(
    State(catalog): State<Catalog>,
    params: Result<Query<BestsellersParams>, QueryRejection>,
) -> Result<Response, BookError> {
    let Query(params) = params?;
    info!("Bestsellers requested with size {}", params.size);

    let cards = catalog.bestsellers(params.size).await?;

    Ok((
        [(header::CACHE_CONTROL, BESTSELLERS_CACHE_CONTROL)],
        Json(cards.as_slice()),
    )
        .into_response())
}

pub async fn book_detail(
    State(catalog): State<Catalog>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, BookError> {
    let Path(id) = id?;
    info!("Book detail requested for {}", id);

    let detail = catalog.book_detail(&id).await?;
    Ok(Json(detail).into_response())
}

/// Any path without a route.
pub async fn not_found(uri: Uri) -> BookError {
    BookError::NotFound(format!("No route for {}", uri.path()))
}

/// A known path requested with a method it does not serve.
pub async fn method_not_allowed(method: Method, uri: Uri) -> BookError {
    BookError::Status {
        status: StatusCode::METHOD_NOT_ALLOWED,
        reason: format!("Method {} not allowed for {}", method, uri.path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(uri: &str) -> Result<BestsellersParams, QueryRejection> {
        let uri: Uri = uri.parse().unwrap();
        Query::<BestsellersParams>::try_from_uri(&uri).map(|Query(params)| params)
    }

    #[test]
    fn test_size_defaults_when_missing_or_empty() {
        assert_eq!(parse("/books/bestsellers").unwrap().size, 10);
        assert_eq!(parse("/books/bestsellers?size=").unwrap().size, 10);
    }

    #[test]
    fn test_size_is_parsed() {
        assert_eq!(parse("/books/bestsellers?size=3").unwrap().size, 3);
        assert_eq!(parse("/books/bestsellers?size=-2").unwrap().size, -2);
    }

    #[test]
    fn test_non_integer_size_is_rejected() {
        assert!(parse("/books/bestsellers?size=many").is_err());
    }
}
