/*
 * Responsibility
 * - /tasks CRUD handlers, all behind the auth gate
 * - Every query is scoped to ctx.user_id; another user's task reads as 404
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::tasks::{CreateTaskRequest, ListTasksParams, TaskResponse, UpdateTaskRequest},
    api::v1::extractors::{AuthCtxExtractor, QueryParams, ValidatedJson},
    error::AppError,
    repos::task_repo,
    state::AppState,
};

pub async fn list_tasks(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    QueryParams(params): QueryParams<ListTasksParams>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let rows = task_repo::list(&state.db, ctx.user_id, params.limit(), params.offset()).await?;

    Ok(Json(rows.into_iter().map(TaskResponse::from).collect()))
}

pub async fn create_task(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    let row = task_repo::create(
        &state.db,
        ctx.user_id,
        req.title.trim(),
        req.description.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_task(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(task_id): Path<i64>,
) -> Result<Json<TaskResponse>, AppError> {
    let row = task_repo::get(&state.db, ctx.user_id, task_id)
        .await?
        .ok_or(AppError::NotFound("task"))?;

    Ok(Json(row.into()))
}

pub async fn update_task(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(task_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    let description: Option<Option<&str>> = req.description.as_ref().map(|inner| inner.as_deref());

    let row = task_repo::update(
        &state.db,
        ctx.user_id,
        task_id,
        req.title.as_deref(),
        description,
        req.completed,
    )
    .await?
    .ok_or(AppError::NotFound("task"))?;

    Ok(Json(row.into()))
}

pub async fn delete_task(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(task_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = task_repo::delete(&state.db, ctx.user_id, task_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("task"))
    }
}
