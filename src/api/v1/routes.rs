/*
 * Responsibility
 * - v1 URL structure
 * - Decide which subtree sits behind the bearer gate: signup/login/health are
 *   public, everything else requires a verified token
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, me, signup},
    health::health,
    tasks::{create_task, delete_task, get_task, list_tasks, update_task},
};

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login));

    let private = Router::new()
        .route("/auth/me", get(me))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{task_id}",
            get(get_task).put(update_task).delete(delete_task),
        );

    public.merge(middleware::auth::apply(private, state.tokens.clone()))
}
