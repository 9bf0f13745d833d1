//! User Service Library
//!
//! CRUD over a single `User` resource, exposed over HTTP and backed by either
//! PostgreSQL (via SeaORM) or an in-memory store. Both stores implement the
//! same `UserRepository` contract and are interchangeable.

pub mod config;
pub mod context;
pub mod extractors;
pub mod handlers;
pub mod infra;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::{StorageBackend, UserServiceConfig};
use crate::infra::Database;
use crate::repository::{InMemoryUserStore, UserRepository, UserStore};
use crate::routes::create_router;
use crate::service::UserManager;
use crate::state::AppState;

pub use crate::context::Context;

/// Wire repository, service and router for the configured backend.
pub async fn build_state(config: UserServiceConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let (repo, database): (Arc<dyn UserRepository>, Option<Database>) = match config.storage {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            (Arc::new(UserStore::new(db.get_connection())), Some(db))
        }
        StorageBackend::Memory => {
            info!("Using in-memory user store");
            (Arc::new(InMemoryUserStore::new()), None)
        }
    };

    let user_service = Arc::new(UserManager::new(repo));
    Ok(AppState::new(user_service, database, config))
}

/// Run the HTTP server until ctrl-c.
pub async fn run_server(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = config.service.addr().parse()?;
    let state = build_state(config).await?;
    let database = state.database.clone();

    let app = create_router(state);

    info!("User service listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await?;
        info!("Database connection closed");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &UserServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
