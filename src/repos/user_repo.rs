/*
 * Responsibility
 * - SQLx operations for the users table
 * - Takes a PgPool; duplicate email surfaces as RepoError::Conflict
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[sqlx(rename = "passwordHash")]
    pub password_hash: String,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub async fn create(
    db: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<UserRow, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (name, email, "passwordHash")
        VALUES ($1, $2, $3)
        RETURNING "userId", name, email, "passwordHash", "createdAt"
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", name, email, "passwordHash", "createdAt"
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", name, email, "passwordHash", "createdAt"
        FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
