use std::sync::Arc;

use crate::application::ports::message_repository::MessageRepository;
use crate::application::ports::relay_port::RelayPort;
use crate::application::ports::session_repository::SessionRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    message_repo: Arc<dyn MessageRepository>,
    session_repo: Arc<dyn SessionRepository>,
    relay: Arc<dyn RelayPort>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        message_repo: Arc<dyn MessageRepository>,
        session_repo: Arc<dyn SessionRepository>,
        relay: Arc<dyn RelayPort>,
    ) -> Self {
        Self {
            user_repo,
            message_repo,
            session_repo,
            relay,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn message_repo(&self) -> Arc<dyn MessageRepository> {
        self.services.message_repo.clone()
    }

    pub fn session_repo(&self) -> Arc<dyn SessionRepository> {
        self.services.session_repo.clone()
    }

    pub fn relay(&self) -> Arc<dyn RelayPort> {
        self.services.relay.clone()
    }
}
