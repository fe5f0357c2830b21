use axum::Router;

use crate::bootstrap::app_context::AppContext;

pub mod auth;
pub mod chat;
pub mod fallback;
pub mod health;
pub mod users;

/// Controller registry: the explicit, statically-declared list of route
/// registration units. Everything is registered before the listener is
/// handed the router.
pub fn routes(ctx: &AppContext) -> Router {
    Router::new()
        .merge(chat::routes(ctx.clone()))
        .merge(auth::routes(ctx.clone()))
        .merge(users::routes(ctx.clone()))
}
