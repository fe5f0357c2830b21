//! Request pipeline composition. The ordering here is a contract: access
//! logging, then the body ceiling, then method override, then the session,
//! then static files ahead of dynamic routes, then user attachment ahead of
//! the controllers, with the `message` view as the 404 fallback.

use axum::Router;
use axum::extract::{DefaultBodyLimit, MatchedPath};
use axum::middleware;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::bootstrap::app_context::AppContext;
use crate::infrastructure::db::PgPool;
use crate::presentation::http;
use crate::presentation::middleware::{current_user, method_override, session};
use crate::presentation::ws;

pub fn build(ctx: AppContext, pool: PgPool) -> Router {
    // Controllers register against the shared router before anything is
    // served; the schema set (migrations) was handled by the caller.
    let controllers = http::routes(&ctx)
        .merge(http::health::routes(pool))
        .merge(ws::routes(ctx.clone()));

    let dynamic = controllers
        .fallback(http::fallback::not_found)
        .layer(middleware::from_fn_with_state(
            ctx.clone(),
            current_user::attach,
        ));

    // Static assets are consulted before dynamic routes; non-GET requests
    // fall straight through to the router.
    let static_first = ServeDir::new(&ctx.cfg.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(dynamic);

    Router::new()
        .fallback_service(static_first)
        .layer(middleware::from_fn_with_state(ctx.clone(), session::attach))
        .layer(middleware::from_fn_with_state(
            ctx.cfg.clone(),
            method_override::rewrite,
        ))
        .layer(DefaultBodyLimit::max(ctx.cfg.body_limit_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        )
}
