/*
 * Responsibility
 * - Meaning the repo layer reports upward
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(sqlx::Error),
    #[error("conflict")]
    Conflict,
}

impl RepoError {
    // 23505 = unique_violation (e.g. users.email)
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict;
        }
        RepoError::Db(e)
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        RepoError::from_sqlx(e)
    }
}
