/*
 * Responsibility
 * - POST /auth/signup, POST /auth/login: the only places a token is minted
 * - GET /auth/me: current account, behind the auth gate
 * - Login failure is uniform: wrong email and wrong password answer the same
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::dto::auth::{AuthResponse, LoginRequest, SignupRequest, UserResponse},
    api::v1::extractors::{AuthCtxExtractor, ValidatedJson},
    error::AppError,
    repos::{error::RepoError, user_repo},
    services::auth::password,
    state::AppState,
};

pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let password_hash = password::hash_password(&req.password)?;

    let row = user_repo::create(&state.db, req.name.trim(), req.email.trim(), &password_hash)
        .await
        .map_err(|e| match e {
            RepoError::Conflict => AppError::Conflict("Email already registered"),
            other => other.into(),
        })?;

    let token = state.tokens.issue(row.id).map_err(|e| {
        tracing::error!(error = %e, "failed to issue token at signup");
        AppError::Internal
    })?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: row.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let row = user_repo::find_by_email(&state.db, req.email.trim())
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    password::verify_password(&req.password, &row.password_hash)?;

    let token = state.tokens.issue(row.id).map_err(|e| {
        tracing::error!(error = %e, "failed to issue token at login");
        AppError::Internal
    })?;

    Ok(Json(AuthResponse {
        token,
        user: row.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::get(&state.db, ctx.user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    Ok(Json(row.into()))
}
