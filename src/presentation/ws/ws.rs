use axum::extract::ws::{Message as AxumMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Router, routing::get};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;

use crate::application::use_cases::chat::post_message::PostMessage;
use crate::bootstrap::app_context::AppContext;
use crate::domain::chat::message::DEFAULT_ROOM;
use crate::domain::users::user::UserSnapshot;
use crate::presentation::middleware::current_user::RequestUser;

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    pub room: Option<String>,
}

/// Client -> server frame. Everything else on the wire is ignored.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    body: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new().route("/ws", get(ws_entry)).with_state(ctx)
}

/// Real-time relay entry, mounted on the same listener as the HTTP routes.
/// Requires a signed-in session; the room defaults to the lobby.
pub async fn ws_entry(
    ws: WebSocketUpgrade,
    Query(query): Query<RoomQuery>,
    user: Option<Extension<RequestUser>>,
    State(ctx): State<AppContext>,
) -> Result<impl IntoResponse, StatusCode> {
    let Some(Extension(RequestUser(user))) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let room = query.room.unwrap_or_else(|| DEFAULT_ROOM.to_string());
    Ok(ws.on_upgrade(move |socket| peer(socket, ctx, user, room)))
}

async fn peer(socket: WebSocket, ctx: AppContext, user: UserSnapshot, room: String) {
    let (mut sink, mut stream) = socket.split();
    let rx = ctx.relay().subscribe(&room).await;
    let mut outbound = BroadcastStream::new(rx);

    let mut send_task = tokio::spawn(async move {
        while let Some(evt) = outbound.next().await {
            // A lagged receiver skips what it missed and keeps going.
            let Ok(evt) = evt else { continue };
            let Ok(text) = serde_json::to_string(&evt) else {
                continue;
            };
            if sink.send(AxumMessage::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let recv_ctx = ctx.clone();
    let recv_room = room.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            let AxumMessage::Text(text) = msg else {
                continue;
            };
            let Ok(frame) = serde_json::from_str::<InboundFrame>(&text) else {
                continue;
            };
            let body = frame.body.trim();
            if body.is_empty() {
                continue;
            }
            let messages = recv_ctx.message_repo();
            let relay = recv_ctx.relay();
            let uc = PostMessage {
                messages: messages.as_ref(),
                relay: relay.as_ref(),
            };
            if let Err(e) = uc.execute(&user, &recv_room, body).await {
                tracing::warn!(room = %recv_room, error = ?e, "ws_message_persist_failed");
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    tracing::debug!(room = %room, "ws_peer_closed");
}
