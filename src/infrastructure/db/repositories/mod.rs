pub mod message_repository_sqlx;
pub mod session_repository_sqlx;
pub mod user_repository_sqlx;
