pub mod message_repository;
pub mod relay_port;
pub mod session_repository;
pub mod user_repository;
