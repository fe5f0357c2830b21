//! Database-backed session middleware. The session is keyed by the
//! `userCookie` cookie and written back to the store on every request
//! regardless of modification — a deliberate tradeoff carried over from the
//! original deployment, not an oversight.

use std::sync::{Arc, Mutex};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::bootstrap::app_context::AppContext;
use crate::domain::sessions::session::SessionRecord;
use crate::domain::users::user::UserSnapshot;

pub const SESSION_COOKIE: &str = "userCookie";

struct SessionState {
    record: SessionRecord,
    destroyed: bool,
}

/// Shared mutable view of the request's session. Handlers mutate it; the
/// middleware persists whatever is left after the response is built.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    fn new(record: SessionRecord) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                record,
                destroyed: false,
            })),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.lock().unwrap().record.id
    }

    pub fn user(&self) -> Option<UserSnapshot> {
        self.inner.lock().unwrap().record.user.clone()
    }

    pub fn set_user(&self, user: UserSnapshot) {
        self.inner.lock().unwrap().record.user = Some(user);
    }

    pub fn chat(&self) -> Option<serde_json::Value> {
        self.inner.lock().unwrap().record.chat.clone()
    }

    pub fn set_chat(&self, chat: serde_json::Value) {
        self.inner.lock().unwrap().record.chat = Some(chat);
    }

    /// Marks the session for deletion; the middleware removes the row and
    /// expires the cookie after the handler returns.
    pub fn destroy(&self) {
        self.inner.lock().unwrap().destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.inner.lock().unwrap().destroyed
    }

    fn snapshot(&self) -> SessionRecord {
        self.inner.lock().unwrap().record.clone()
    }
}

pub fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_session_cookie(id: Uuid, max_age_ms: i64) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE,
        id,
        (max_age_ms / 1000).max(0)
    )
}

fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax", SESSION_COOKIE)
}

fn append_set_cookie(res: &mut Response, cookie: &str) {
    if let Ok(v) = http::HeaderValue::from_str(cookie) {
        res.headers_mut().append(http::header::SET_COOKIE, v);
    }
}

pub async fn attach(State(ctx): State<AppContext>, mut req: Request, next: Next) -> Response {
    let repo = ctx.session_repo();
    let max_age_ms = ctx.cfg.session_max_age_ms;

    let cookie_sid = req
        .headers()
        .get(http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| get_cookie(h, SESSION_COOKIE))
        .and_then(|s| Uuid::parse_str(&s).ok());

    // A store failure leaves the request with an in-memory session.
    let (record, is_new) = match cookie_sid {
        Some(id) => match repo.find(id).await {
            Ok(Some(r)) => (r, false),
            Ok(None) => (SessionRecord::new(max_age_ms), true),
            Err(e) => {
                tracing::warn!(error = ?e, "session_load_failed");
                (SessionRecord::new(max_age_ms), true)
            }
        },
        None => (SessionRecord::new(max_age_ms), true),
    };

    let handle = SessionHandle::new(record);
    req.extensions_mut().insert(handle.clone());

    let mut res = next.run(req).await;

    if handle.is_destroyed() {
        if !is_new {
            if let Err(e) = repo.delete(handle.id()).await {
                tracing::warn!(error = ?e, "session_delete_failed");
            }
        }
        append_set_cookie(&mut res, &expired_session_cookie());
    } else {
        let mut record = handle.snapshot();
        record.touch(max_age_ms);
        if let Err(e) = repo.save(&record).await {
            tracing::warn!(error = ?e, "session_save_failed");
        }
        if is_new {
            append_set_cookie(&mut res, &build_session_cookie(record.id, max_age_ms));
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_header_parsing_finds_named_cookie() {
        let header = "theme=dark; userCookie=3f2aa794-9c8e-4f0b-9d3e-0a1b2c3d4e5f; other=1";
        assert_eq!(
            get_cookie(header, SESSION_COOKIE).as_deref(),
            Some("3f2aa794-9c8e-4f0b-9d3e-0a1b2c3d4e5f")
        );
        assert!(get_cookie(header, "missing").is_none());
    }

    #[test]
    fn session_cookie_is_http_only_with_the_fixed_window() {
        let id = Uuid::new_v4();
        let cookie = build_session_cookie(id, 51_200_000);
        assert!(cookie.starts_with(&format!("userCookie={id}")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=51200"));
    }

    #[test]
    fn destroyed_handle_reports_destroyed() {
        let handle = SessionHandle::new(SessionRecord::new(1000));
        assert!(!handle.is_destroyed());
        handle.destroy();
        assert!(handle.is_destroyed());
    }
}
