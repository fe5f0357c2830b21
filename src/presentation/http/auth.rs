use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use serde::Deserialize;

use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::middleware::session::SessionHandle;
use crate::presentation::views;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
        .with_state(ctx)
}

async fn register_form() -> Response {
    views::register_page(None).into_response()
}

async fn register(
    State(ctx): State<AppContext>,
    Extension(session): Extension<SessionHandle>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        email: form.email.clone(),
        name: form.name.clone(),
        password: form.password,
    };
    match uc.execute(&dto).await {
        Ok(user) => {
            session.set_user(user.snapshot());
            Redirect::to("/chat").into_response()
        }
        Err(e) => {
            tracing::warn!(email = %form.email, error = ?e, "register_failed");
            let page = views::message_page(&views::MessageView {
                title: "Register",
                msg: "Could not create the account.",
                status: 409,
                error: "Email already registered.",
                user: None,
                chat: session.chat().as_ref(),
            });
            (StatusCode::CONFLICT, page).into_response()
        }
    }
}

async fn login_form() -> Response {
    views::login_page(None).into_response()
}

async fn login(
    State(ctx): State<AppContext>,
    Extension(session): Extension<SessionHandle>,
    Form(form): Form<LoginForm>,
) -> Response {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: form.email.clone(),
        password: form.password,
    };
    match uc.execute(&dto).await {
        Ok(Some(user)) => {
            session.set_user(user.snapshot());
            Redirect::to("/chat").into_response()
        }
        Ok(None) => {
            let page = views::message_page(&views::MessageView {
                title: "Sign in",
                msg: "Sign in failed.",
                status: 401,
                error: "Invalid email or password.",
                user: None,
                chat: session.chat().as_ref(),
            });
            (StatusCode::UNAUTHORIZED, page).into_response()
        }
        Err(e) => {
            tracing::error!(email = %form.email, error = ?e, "login_failed");
            let page = views::message_page(&views::MessageView {
                title: "Sign in",
                msg: "Sign in failed.",
                status: 500,
                error: "Something went wrong.",
                user: None,
                chat: None,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
        }
    }
}

async fn logout(Extension(session): Extension<SessionHandle>) -> Response {
    session.destroy();
    Redirect::to("/login").into_response()
}
