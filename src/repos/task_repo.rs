/*
 * Responsibility
 * - tasks CRUD, always scoped by "ownerId"
 * - update/delete filter on owner in SQL, so another user's task reads as
 *   absent rather than forbidden
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    #[sqlx(rename = "taskId")]
    pub task_id: i64,

    pub title: String,
    pub description: Option<String>,
    pub completed: bool,

    #[sqlx(rename = "ownerId")]
    pub owner_id: Uuid,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

pub async fn list(
    db: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<TaskRow>, RepoError> {
    let rows = sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT
            "taskId", title, description, completed, "ownerId", "createdAt", "updatedAt"
        FROM tasks
        WHERE "ownerId" = $1
        ORDER BY "taskId" DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: Option<&str>,
) -> Result<TaskRow, RepoError> {
    let row = sqlx::query_as::<_, TaskRow>(
        r#"
        INSERT INTO tasks (title, description, "ownerId")
        VALUES ($1, $2, $3)
        RETURNING
            "taskId", title, description, completed, "ownerId", "createdAt", "updatedAt"
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(owner_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, owner_id: Uuid, task_id: i64) -> Result<Option<TaskRow>, RepoError> {
    let row = sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT
            "taskId", title, description, completed, "ownerId", "createdAt", "updatedAt"
        FROM tasks
        WHERE "taskId" = $1 AND "ownerId" = $2
        "#,
    )
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    owner_id: Uuid,
    task_id: i64,
    title: Option<&str>,
    description: Option<Option<&str>>,
    completed: Option<bool>,
) -> Result<Option<TaskRow>, RepoError> {
    // description tri-state:
    // - None: do not update
    // - Some(None): set NULL
    // - Some(Some(v)): set v
    let row = sqlx::query_as::<_, TaskRow>(
        r#"
        UPDATE tasks
        SET
            title = COALESCE($3, title),
            description = CASE
                WHEN $4 = false THEN description
                ELSE $5
            END,
            completed = COALESCE($6, completed),
            "updatedAt" = now()
        WHERE "taskId" = $1 AND "ownerId" = $2
        RETURNING
            "taskId", title, description, completed, "ownerId", "createdAt", "updatedAt"
        "#,
    )
    .bind(task_id)
    .bind(owner_id)
    .bind(title)
    .bind(description.is_some())
    .bind(description.flatten())
    .bind(completed)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, owner_id: Uuid, task_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM tasks
        WHERE "taskId" = $1 AND "ownerId" = $2
        "#,
    )
    .bind(task_id)
    .bind(owner_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
