//! User-attachment middleware: when the session carries a user, the
//! authoritative record is re-fetched by email and the password-free
//! snapshot is written to both the request extensions and the session.
//! Lookup failure skips attachment and never aborts the request.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::use_cases::auth::current_user::CurrentUser;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::user::UserSnapshot;
use crate::presentation::middleware::session::SessionHandle;

/// The signed-in user attached to the request, if any.
#[derive(Debug, Clone)]
pub struct RequestUser(pub UserSnapshot);

pub async fn attach(State(ctx): State<AppContext>, mut req: Request, next: Next) -> Response {
    let session = req.extensions().get::<SessionHandle>().cloned();
    if let Some(session) = session {
        if let Some(stale) = session.user() {
            let repo = ctx.user_repo();
            let uc = CurrentUser {
                repo: repo.as_ref(),
            };
            match uc.execute(&stale.email).await {
                Ok(Some(row)) => {
                    let fresh = row.snapshot();
                    session.set_user(fresh.clone());
                    req.extensions_mut().insert(RequestUser(fresh));
                }
                // Unknown email: proceed unattached.
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = ?e, "user_attach_failed");
                }
            }
        }
    }
    next.run(req).await
}
