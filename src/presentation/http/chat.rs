use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Extension, Form, Json, Router};
use serde::{Deserialize, Serialize};

use crate::application::use_cases::chat::list_messages::ListMessages;
use crate::application::use_cases::chat::post_message::PostMessage;
use crate::bootstrap::app_context::AppContext;
use crate::domain::chat::message::DEFAULT_ROOM;
use crate::presentation::middleware::current_user::RequestUser;
use crate::presentation::middleware::session::SessionHandle;
use crate::presentation::views;

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    pub room: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageForm {
    pub body: String,
    pub room: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageItem {
    pub room: String,
    pub sender: String,
    pub body: String,
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", get(page))
        .route("/chat/messages", get(history).post(post_message))
        .with_state(ctx)
}

async fn index(user: Option<Extension<RequestUser>>) -> Redirect {
    if user.is_some() {
        Redirect::to("/chat")
    } else {
        Redirect::to("/login")
    }
}

async fn page(
    State(ctx): State<AppContext>,
    Extension(session): Extension<SessionHandle>,
    user: Option<Extension<RequestUser>>,
    Query(q): Query<RoomQuery>,
) -> Response {
    let Some(Extension(RequestUser(user))) = user else {
        return Redirect::to("/login").into_response();
    };
    let room = q.room.unwrap_or_else(|| DEFAULT_ROOM.to_string());
    session.set_chat(serde_json::json!({ "room": room }));

    let repo = ctx.message_repo();
    let uc = ListMessages {
        messages: repo.as_ref(),
    };
    match uc.execute(&room, ctx.cfg.chat_history_limit).await {
        Ok(history) => views::chat_page(&user, &room, &history).into_response(),
        Err(e) => {
            tracing::error!(room, error = ?e, "chat_history_failed");
            let page = views::message_page(&views::MessageView {
                title: "Chat",
                msg: "Chat is unavailable.",
                status: 500,
                error: "Database unavailable.",
                user: Some(&user),
                chat: session.chat().as_ref(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
        }
    }
}

async fn history(
    State(ctx): State<AppContext>,
    user: Option<Extension<RequestUser>>,
    Query(q): Query<RoomQuery>,
) -> Result<Json<Vec<MessageItem>>, StatusCode> {
    if user.is_none() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let room = q.room.unwrap_or_else(|| DEFAULT_ROOM.to_string());
    let limit = q.limit.unwrap_or(ctx.cfg.chat_history_limit);
    let repo = ctx.message_repo();
    let uc = ListMessages {
        messages: repo.as_ref(),
    };
    let msgs = uc
        .execute(&room, limit)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(
        msgs.into_iter()
            .map(|m| MessageItem {
                room: m.room,
                sender: m.sender_name,
                body: m.body,
                sent_at: m.sent_at,
            })
            .collect(),
    ))
}

async fn post_message(
    State(ctx): State<AppContext>,
    Extension(session): Extension<SessionHandle>,
    user: Option<Extension<RequestUser>>,
    Form(form): Form<PostMessageForm>,
) -> Response {
    let Some(Extension(RequestUser(user))) = user else {
        return Redirect::to("/login").into_response();
    };
    let room = form
        .room
        .or_else(|| {
            session
                .chat()
                .and_then(|c| c.get("room").and_then(|r| r.as_str().map(str::to_owned)))
        })
        .unwrap_or_else(|| DEFAULT_ROOM.to_string());
    let body = form.body.trim().to_string();
    if body.is_empty() {
        return Redirect::to("/chat").into_response();
    }

    let messages = ctx.message_repo();
    let relay = ctx.relay();
    let uc = PostMessage {
        messages: messages.as_ref(),
        relay: relay.as_ref(),
    };
    match uc.execute(&user, &room, &body).await {
        Ok(_) => Redirect::to("/chat").into_response(),
        Err(e) => {
            tracing::error!(room, error = ?e, "post_message_failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
