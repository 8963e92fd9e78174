//! Bearer-token gate for private routes.
//!
//! `Authorization: Bearer <token>` → extract → verify → insert `AuthCtx`
//! into request extensions for downstream extractors.
//!
//! Rejections:
//! - header missing, scheme not `Bearer `, or token empty
//!   → 401 `Not authorized, no token` (the codec is never consulted)
//! - signature/expiry failure → 401 `Not authorized, token failed`
//!   (the underlying kind is logged, never sent to the client)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::token::TokenCodec;

/// Layer the gate over a (private) route subtree.
///
/// Takes the codec rather than the whole AppState, so the gate can be
/// exercised without a database pool.
pub fn apply<S>(router: Router<S>, codec: TokenCodec) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(codec, require_auth))
}

async fn require_auth(
    State(codec): State<TokenCodec>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    // Extraction happens strictly before verification: a request with no
    // usable token never reaches the codec.
    let token = header
        .and_then(extract_bearer_token)
        .ok_or(AppError::MissingToken)?;

    let user_id = match codec.verify(token) {
        Ok(user_id) => user_id,
        Err(err) => {
            tracing::warn!(error = %err, "bearer token verification failed");
            return Err(AppError::TokenRejected);
        }
    };

    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}

/// Isolate the token substring after the `Bearer` scheme and one space.
fn extract_bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?;
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::api::v1::extractors::AuthCtxExtractor;

    const SECRET: &str = "test-secret-test-secret-test-secret!";

    async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> String {
        ctx.user_id.to_string()
    }

    fn router(codec: TokenCodec) -> Router {
        apply(Router::new().route("/whoami", get(whoami)), codec)
    }

    fn request(auth_header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_message(res: Response) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        v["message"].as_str().unwrap().to_string()
    }

    #[test]
    fn bearer_extraction_isolates_the_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer a.b.c"), Some("a.b.c"));
        // Empty token after the scheme
        assert_eq!(extract_bearer_token("Bearer "), None);
        // Wrong or missing scheme
        assert_eq!(extract_bearer_token("Bearer"), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("bearer abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[tokio::test]
    async fn missing_header_is_rejected_before_verification() {
        let res = router(TokenCodec::new(SECRET, 3600))
            .oneshot(request(None))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_message(res).await, "Not authorized, no token");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected_as_missing() {
        let res = router(TokenCodec::new(SECRET, 3600))
            .oneshot(request(Some("Basic dXNlcjpwdw==")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_message(res).await, "Not authorized, no token");
    }

    #[tokio::test]
    async fn empty_token_is_rejected_as_missing() {
        let res = router(TokenCodec::new(SECRET, 3600))
            .oneshot(request(Some("Bearer ")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_message(res).await, "Not authorized, no token");
    }

    #[tokio::test]
    async fn token_shaped_garbage_fails_verification() {
        let res = router(TokenCodec::new(SECRET, 3600))
            .oneshot(request(Some("Bearer abc.def.ghi")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_message(res).await, "Not authorized, token failed");
    }

    #[tokio::test]
    async fn expired_token_fails_verification() {
        let codec = TokenCodec::new(SECRET, -3600);
        let token = codec.issue(Uuid::new_v4()).unwrap();

        let res = router(codec)
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_message(res).await, "Not authorized, token failed");
    }

    #[tokio::test]
    async fn token_from_another_secret_fails_verification() {
        let other = TokenCodec::new("another-secret-another-secret-12", 3600);
        let token = other.issue(Uuid::new_v4()).unwrap();

        let res = router(TokenCodec::new(SECRET, 3600))
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_message(res).await, "Not authorized, token failed");
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_subject() {
        let codec = TokenCodec::new(SECRET, 3600);
        let user_id = Uuid::new_v4();
        let token = codec.issue(user_id).unwrap();

        let res = router(codec)
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, user_id.to_string().as_bytes());
    }
}
