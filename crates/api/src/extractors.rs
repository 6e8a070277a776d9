//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::{Deserialize, de::DeserializeOwned};
use vidtube_common::{AppError, PageRequest};
use vidtube_db::entities::user;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawPage {
    page: Option<String>,
    limit: Option<String>,
}

/// `page` and `limit` from the query string, validated.
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub PageRequest);

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPage>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::InvalidArgument(e.body_text()))?;
        PageRequest::parse(raw.page.as_deref(), raw.limit.as_deref()).map(Pagination)
    }
}

/// Query string parameters whose rejections render as the error envelope.
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::InvalidArgument(e.body_text()))?;
        Ok(Self(value))
    }
}

/// JSON body whose rejections render as the error envelope.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidArgument(e.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn pagination(uri: &str) -> Result<Pagination, AppError> {
        let (mut parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        Pagination::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_pagination_defaults() {
        let Pagination(req) = pagination("/comments/video/x").await.unwrap();
        assert_eq!(req, PageRequest::default());
    }

    #[tokio::test]
    async fn test_pagination_parses_values() {
        let Pagination(req) = pagination("/x?page=3&limit=2").await.unwrap();
        assert_eq!(req.page(), 3);
        assert_eq!(req.limit(), 2);
    }

    #[tokio::test]
    async fn test_pagination_rejects_garbage() {
        let result = pagination("/x?page=first").await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_auth_user_missing_is_unauthorized() {
        let (mut parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
