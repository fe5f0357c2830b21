use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{delete, get};
use axum::{Extension, Router};

use crate::application::use_cases::users::delete_account::DeleteAccount;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::middleware::current_user::RequestUser;
use crate::presentation::middleware::session::SessionHandle;
use crate::presentation::views;

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/profile", get(profile))
        // Reached by browsers through the `_method=DELETE` override.
        .route("/users", delete(delete_account))
        .with_state(ctx)
}

async fn profile(user: Option<Extension<RequestUser>>) -> Response {
    match user {
        Some(Extension(RequestUser(user))) => views::profile_page(&user).into_response(),
        None => Redirect::to("/login").into_response(),
    }
}

async fn delete_account(
    State(ctx): State<AppContext>,
    Extension(session): Extension<SessionHandle>,
    user: Option<Extension<RequestUser>>,
) -> Response {
    let Some(Extension(RequestUser(user))) = user else {
        return Redirect::to("/login").into_response();
    };
    let repo = ctx.user_repo();
    let uc = DeleteAccount {
        repo: repo.as_ref(),
    };
    match uc.execute(user.id).await {
        Ok(true) => {
            session.destroy();
            let page = views::message_page(&views::MessageView {
                title: "Account",
                msg: "Account deleted.",
                status: 200,
                error: "",
                user: None,
                chat: None,
            });
            (StatusCode::OK, page).into_response()
        }
        Ok(false) => {
            let page = views::message_page(&views::MessageView {
                title: "Account",
                msg: "User not found.",
                status: 404,
                error: "",
                user: None,
                chat: None,
            });
            (StatusCode::NOT_FOUND, page).into_response()
        }
        Err(e) => {
            tracing::error!(user_id = %user.id, error = ?e, "delete_account_failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
