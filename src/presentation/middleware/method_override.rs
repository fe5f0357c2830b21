//! HTTP method override: clients that can only issue POSTs declare the
//! intended verb in a `_method` body field. The field is consumed here, so
//! route handlers never see it.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::bootstrap::config::Config;

pub const OVERRIDE_FIELD: &str = "_method";

enum BodyKind {
    Json,
    Form,
}

fn body_kind(content_type: &str) -> Option<BodyKind> {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    match mime {
        "application/json" => Some(BodyKind::Json),
        "application/x-www-form-urlencoded" => Some(BodyKind::Form),
        _ => None,
    }
}

/// Returns the rewritten body and the override verb, if one was present.
/// Bodies that do not parse pass through untouched.
fn strip_override(bytes: &[u8], kind: &BodyKind) -> (Vec<u8>, Option<String>) {
    match kind {
        BodyKind::Json => {
            let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(bytes) else {
                return (bytes.to_vec(), None);
            };
            let Some(map) = value.as_object_mut() else {
                return (bytes.to_vec(), None);
            };
            let Some(serde_json::Value::String(method)) = map.remove(OVERRIDE_FIELD) else {
                return (bytes.to_vec(), None);
            };
            match serde_json::to_vec(&value) {
                Ok(out) => (out, Some(method)),
                Err(_) => (bytes.to_vec(), None),
            }
        }
        BodyKind::Form => {
            let Ok(pairs) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes) else {
                return (bytes.to_vec(), None);
            };
            let mut method = None;
            let rest: Vec<(String, String)> = pairs
                .into_iter()
                .filter(|(k, v)| {
                    if k == OVERRIDE_FIELD {
                        method.get_or_insert_with(|| v.clone());
                        false
                    } else {
                        true
                    }
                })
                .collect();
            if method.is_none() {
                return (bytes.to_vec(), None);
            }
            match serde_urlencoded::to_string(&rest) {
                Ok(out) => (out.into_bytes(), method),
                Err(_) => (bytes.to_vec(), None),
            }
        }
    }
}

pub async fn rewrite(State(cfg): State<Config>, req: Request, next: Next) -> Response {
    let kind = match req
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(body_kind)
    {
        Some(k) => k,
        None => return next.run(req).await,
    };

    let (mut parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, cfg.body_limit_bytes).await {
        Ok(b) => b,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };

    let (bytes, method) = strip_override(&bytes, &kind);
    if let Some(method) = method {
        // An unknown verb name leaves the method as issued.
        if let Ok(m) = Method::from_bytes(method.to_ascii_uppercase().as_bytes()) {
            parts.method = m;
        }
    }
    if let Ok(len) = http::HeaderValue::from_str(&bytes.len().to_string()) {
        parts.headers.insert(http::header::CONTENT_LENGTH, len);
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_override_is_stripped() {
        let (body, method) = strip_override(
            br#"{"_method":"DELETE","keep":"me"}"#,
            &BodyKind::Json,
        );
        assert_eq!(method.as_deref(), Some("DELETE"));
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value.get(OVERRIDE_FIELD).is_none());
        assert_eq!(value["keep"], "me");
    }

    #[test]
    fn form_override_is_stripped_and_rest_preserved() {
        let (body, method) = strip_override(b"_method=delete&body=hello", &BodyKind::Form);
        assert_eq!(method.as_deref(), Some("delete"));
        assert_eq!(String::from_utf8(body).unwrap(), "body=hello");
    }

    #[test]
    fn body_without_override_passes_through() {
        let (body, method) = strip_override(br#"{"keep":"me"}"#, &BodyKind::Json);
        assert!(method.is_none());
        assert_eq!(body, br#"{"keep":"me"}"#.to_vec());
    }

    #[test]
    fn non_object_and_invalid_bodies_pass_through() {
        let (body, method) = strip_override(br#"[1,2,3]"#, &BodyKind::Json);
        assert!(method.is_none());
        assert_eq!(body, br#"[1,2,3]"#.to_vec());

        let (body, method) = strip_override(b"not json at all", &BodyKind::Json);
        assert!(method.is_none());
        assert_eq!(body, b"not json at all".to_vec());
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        assert!(matches!(
            body_kind("application/json; charset=utf-8"),
            Some(BodyKind::Json)
        ));
        assert!(matches!(
            body_kind("application/x-www-form-urlencoded"),
            Some(BodyKind::Form)
        ));
        assert!(body_kind("text/plain").is_none());
    }
}
