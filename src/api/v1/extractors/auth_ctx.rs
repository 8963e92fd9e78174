/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - The auth middleware verifies the token and stores AuthCtx in request
 *   extensions; handlers receive it only through this extractor
 */
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

/// Context attached to an authenticated request.
///
/// `user_id` is the verified subject of the bearer credential. Handlers use
/// it for per-user decisions ("does this task belong to this user").
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: Uuid,
}

impl AuthCtx {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Extractor for handlers behind the auth gate.
///
/// Missing AuthCtx means the route was wired without the middleware; that is
/// a routing mistake and still answers as unauthorized.
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::MissingToken)
    }
}
