use axum::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::presentation::middleware::session::SessionHandle;
use crate::presentation::views;

/// Fallback for requests no static asset or registered route matched:
/// renders the `message` view with the current session's user/chat context.
pub async fn not_found(session: Option<Extension<SessionHandle>>) -> Response {
    let (user, chat) = match session {
        Some(Extension(s)) => (s.user(), s.chat()),
        None => (None, None),
    };
    let page = views::message_page(&views::MessageView {
        title: "404",
        msg: "Page Not Found.",
        status: 404,
        error: "",
        user: user.as_ref(),
        chat: chat.as_ref(),
    });
    (StatusCode::NOT_FOUND, page).into_response()
}
