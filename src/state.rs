/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone is cheap: PgPool is an Arc internally, TokenCodec clones its keys
 */
use sqlx::PgPool;

use crate::services::auth::token::TokenCodec;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenCodec,
}

impl AppState {
    pub fn new(db: PgPool, tokens: TokenCodec) -> Self {
        Self { db, tokens }
    }
}
