/*
 * Responsibility
 * - Query-string extraction with the app's 400 body shape
 * - axum's plain-text Query rejection would break the {message, errors}
 *   contract, so the rejection is normalized here
 */
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::{AppError, FieldError};

pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                AppError::Validation(vec![FieldError {
                    field: "query".to_string(),
                    message: e.body_text(),
                }])
            })?;

        Ok(QueryParams(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::dto::tasks::ListTasksParams;

    fn router() -> Router {
        Router::new().route(
            "/items",
            get(|QueryParams(params): QueryParams<ListTasksParams>| async move {
                format!("{}:{}", params.limit(), params.offset())
            }),
        )
    }

    async fn send(uri: &str) -> axum::response::Response {
        router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn valid_query_parses() {
        let res = send("/items?limit=10&offset=20").await;

        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, "10:20".as_bytes());
    }

    #[tokio::test]
    async fn absent_query_uses_defaults() {
        let res = send("/items").await;

        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, "50:0".as_bytes());
    }

    #[tokio::test]
    async fn malformed_query_answers_the_contract_body() {
        let res = send("/items?limit=abc").await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Invalid request data");
        assert_eq!(body["errors"][0]["field"], "query");
    }
}
