//! In-memory implementation of `UserRepository`.
//!
//! A single reader/writer lock guards the whole map: reads share it, every
//! mutation takes it exclusively. Records are kept in id order so paging
//! matches the relational store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::{RepoResult, RepositoryError};
use super::user_repository::UserRepository;
use crate::context::Context;
use domain::{generate_user_id, user::now, ListWindow, User};

/// Concurrency-safe in-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

/// Draw ids until one is not in use.
fn fresh_id(users: &BTreeMap<String, User>) -> String {
    loop {
        let id = generate_user_id();
        if !users.contains_key(&id) {
            return id;
        }
    }
}

fn email_taken(users: &BTreeMap<String, User>, email: &str, except_id: Option<&str>) -> bool {
    users
        .values()
        .any(|u| u.email == email && Some(u.id.as_str()) != except_id)
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn create(&self, ctx: &Context, mut user: User) -> RepoResult<User> {
        ctx.run(async move {
            let mut users = self.users.write().await;

            if email_taken(&users, &user.email, None) {
                return Err(RepositoryError::AlreadyExists);
            }

            let caller_id = user.has_id();
            user.prepare_for_insert(now(), || fresh_id(&users));
            if caller_id && users.contains_key(&user.id) {
                return Err(RepositoryError::AlreadyExists);
            }

            users.insert(user.id.clone(), user.clone());
            Ok(user)
        })
        .await
    }

    async fn get_by_id(&self, ctx: &Context, id: &str) -> RepoResult<Option<User>> {
        ctx.run(async {
            let users = self.users.read().await;
            Ok(users.get(id).cloned())
        })
        .await
    }

    async fn get_by_email(&self, ctx: &Context, email: &str) -> RepoResult<Option<User>> {
        ctx.run(async {
            let users = self.users.read().await;
            Ok(users.values().find(|u| u.email == email).cloned())
        })
        .await
    }

    async fn update(&self, ctx: &Context, mut user: User) -> RepoResult<User> {
        ctx.run(async move {
            let mut users = self.users.write().await;

            let stored = users
                .get(&user.id)
                .cloned()
                .ok_or(RepositoryError::NotFound)?;

            if email_taken(&users, &user.email, Some(user.id.as_str())) {
                return Err(RepositoryError::AlreadyExists);
            }

            user.stamp_update(&stored, now());
            users.insert(user.id.clone(), user.clone());
            Ok(user)
        })
        .await
    }

    async fn delete(&self, ctx: &Context, id: &str) -> RepoResult<()> {
        ctx.run(async {
            let mut users = self.users.write().await;
            users
                .remove(id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound)
        })
        .await
    }

    async fn list(&self, ctx: &Context, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let window = ListWindow::new(limit, offset);

        ctx.run(async {
            if window.is_empty() {
                return Ok(Vec::new());
            }

            let skip = usize::try_from(window.offset).unwrap_or(usize::MAX);
            let take = usize::try_from(window.limit).unwrap_or(usize::MAX);

            let users = self.users.read().await;
            Ok(users.values().skip(skip).take(take).cloned().collect())
        })
        .await
    }
}
