//! Application state for dependency injection.

use std::sync::Arc;

use crate::config::UserServiceConfig;
use crate::context::Context;
use crate::infra::Database;
use crate::service::UserService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    /// Present when the relational store is wired in; used for health checks
    pub database: Option<Database>,
    pub config: UserServiceConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        users: Arc<dyn UserService>,
        database: Option<Database>,
        config: UserServiceConfig,
    ) -> Self {
        Self {
            users,
            database,
            config,
        }
    }

    /// Execution context for one request, bounded by the configured timeout.
    pub fn request_context(&self) -> Context {
        Context::with_timeout(self.config.service.request_timeout())
    }
}
