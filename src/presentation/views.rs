//! Server-rendered HTML. Every dynamic value is escaped before
//! interpolation; user-controlled text never reaches the page raw.

use axum::response::Html;
use htmlescape::encode_minimal;

use crate::domain::chat::message::Message;
use crate::domain::users::user::UserSnapshot;

/// Context for the `message` view, the fallback render target.
pub struct MessageView<'a> {
    pub title: &'a str,
    pub msg: &'a str,
    pub status: u16,
    pub error: &'a str,
    pub user: Option<&'a UserSnapshot>,
    pub chat: Option<&'a serde_json::Value>,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <link rel=\"stylesheet\" href=\"/style.css\">\n</head>\n<body>\n{}\n</body>\n</html>\n",
        encode_minimal(title),
        body
    )
}

fn session_footer(user: Option<&UserSnapshot>, chat: Option<&serde_json::Value>) -> String {
    let mut out = String::new();
    if let Some(u) = user {
        out.push_str(&format!(
            "<p class=\"session-user\">Signed in as {} &lt;{}&gt;</p>\n",
            encode_minimal(&u.name),
            encode_minimal(&u.email)
        ));
    }
    if let Some(c) = chat {
        out.push_str(&format!(
            "<p class=\"session-chat\" data-chat=\"{}\"></p>\n",
            encode_minimal(&c.to_string())
        ));
    }
    out
}

pub fn message_page(view: &MessageView) -> Html<String> {
    let mut body = format!(
        "<main class=\"message\" data-status=\"{}\">\n<h1>{}</h1>\n<p class=\"msg\">{}</p>\n",
        view.status,
        encode_minimal(view.title),
        encode_minimal(view.msg)
    );
    if !view.error.is_empty() {
        body.push_str(&format!(
            "<p class=\"error\">{}</p>\n",
            encode_minimal(view.error)
        ));
    }
    body.push_str(&session_footer(view.user, view.chat));
    body.push_str("</main>");
    Html(layout(view.title, &body))
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    let mut body = String::from(
        "<main class=\"auth\">\n<h1>Sign in</h1>\n\
         <form method=\"post\" action=\"/login\">\n\
         <input name=\"email\" type=\"email\" placeholder=\"email\" required>\n\
         <input name=\"password\" type=\"password\" placeholder=\"password\" required>\n\
         <button type=\"submit\">Sign in</button>\n</form>\n\
         <p><a href=\"/register\">Create an account</a></p>\n",
    );
    if let Some(e) = error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", encode_minimal(e)));
    }
    body.push_str("</main>");
    Html(layout("Sign in", &body))
}

pub fn register_page(error: Option<&str>) -> Html<String> {
    let mut body = String::from(
        "<main class=\"auth\">\n<h1>Create account</h1>\n\
         <form method=\"post\" action=\"/register\">\n\
         <input name=\"name\" placeholder=\"name\" required>\n\
         <input name=\"email\" type=\"email\" placeholder=\"email\" required>\n\
         <input name=\"password\" type=\"password\" placeholder=\"password\" required>\n\
         <button type=\"submit\">Register</button>\n</form>\n\
         <p><a href=\"/login\">Sign in instead</a></p>\n",
    );
    if let Some(e) = error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", encode_minimal(e)));
    }
    body.push_str("</main>");
    Html(layout("Create account", &body))
}

pub fn chat_page(user: &UserSnapshot, room: &str, history: &[Message]) -> Html<String> {
    let mut items = String::new();
    for m in history {
        items.push_str(&format!(
            "<li><span class=\"sender\">{}</span>: <span class=\"body\">{}</span></li>\n",
            encode_minimal(&m.sender_name),
            encode_minimal(&m.body)
        ));
    }
    let body = format!(
        "<main class=\"chat\" data-room=\"{room}\">\n<h1>#{room}</h1>\n\
         <ul id=\"messages\">\n{items}</ul>\n\
         <form method=\"post\" action=\"/chat/messages\">\n\
         <input type=\"hidden\" name=\"room\" value=\"{room}\">\n\
         <input name=\"body\" placeholder=\"say something\" autocomplete=\"off\" required>\n\
         <button type=\"submit\">Send</button>\n</form>\n\
         <p class=\"session-user\">Signed in as {name} &mdash; \
         <a href=\"/profile\">profile</a></p>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Sign out</button></form>\n\
         <script src=\"/chat.js\"></script>\n</main>",
        room = encode_minimal(room),
        items = items,
        name = encode_minimal(&user.name),
    );
    Html(layout("Chat", &body))
}

pub fn profile_page(user: &UserSnapshot) -> Html<String> {
    let body = format!(
        "<main class=\"profile\">\n<h1>Profile</h1>\n\
         <p class=\"session-user\">{} &lt;{}&gt;</p>\n\
         <form method=\"post\" action=\"/users\">\n\
         <input type=\"hidden\" name=\"_method\" value=\"DELETE\">\n\
         <button type=\"submit\">Delete account</button>\n</form>\n\
         <p><a href=\"/chat\">Back to chat</a></p>\n</main>",
        encode_minimal(&user.name),
        encode_minimal(&user.email),
    );
    Html(layout("Profile", &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn snapshot() -> UserSnapshot {
        UserSnapshot {
            id: Uuid::new_v4(),
            email: "kim@example.com".into(),
            name: "<kim>".into(),
        }
    }

    #[test]
    fn message_page_escapes_and_carries_session_context() {
        let user = snapshot();
        let chat = serde_json::json!({"room": "lobby"});
        let Html(html) = message_page(&MessageView {
            title: "404",
            msg: "Page Not Found.",
            status: 404,
            error: "",
            user: Some(&user),
            chat: Some(&chat),
        });
        assert!(html.contains("data-status=\"404\""));
        assert!(html.contains("Page Not Found."));
        assert!(html.contains("&lt;kim&gt;"));
        assert!(!html.contains("<kim>"));
        assert!(html.contains("session-chat"));
        // No error paragraph when the error string is empty.
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn message_page_without_session_renders_no_user_block() {
        let Html(html) = message_page(&MessageView {
            title: "404",
            msg: "Page Not Found.",
            status: 404,
            error: "",
            user: None,
            chat: None,
        });
        assert!(!html.contains("session-user"));
        assert!(!html.contains("session-chat"));
    }

    #[test]
    fn chat_page_escapes_history_bodies() {
        let user = snapshot();
        let history = vec![Message {
            id: Uuid::new_v4(),
            room: "lobby".into(),
            sender_id: user.id,
            sender_name: "kim".into(),
            body: "<script>alert(1)</script>".into(),
            sent_at: chrono::Utc::now(),
        }];
        let Html(html) = chat_page(&user, "lobby", &history);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
