//! User repository contract and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::error::{RepoResult, RepositoryError};
use crate::context::Context;
use domain::{generate_user_id, user::now, ListWindow, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Every implementation must behave identically:
/// - `get_*` return `Ok(None)` for a missing user, never `NotFound`
/// - `create` and `update` reject an email held by another live user with
///   `AlreadyExists`
/// - `update` and `delete` on an unknown id fail with `NotFound`
/// - `list` orders by id; `limit <= 0` yields nothing, `offset < 0` counts
///   from the start
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, assigning an id and timestamps when unset.
    /// Returns the record exactly as stored.
    async fn create(&self, ctx: &Context, user: User) -> RepoResult<User>;

    /// Find user by ID
    async fn get_by_id(&self, ctx: &Context, id: &str) -> RepoResult<Option<User>>;

    /// Find user by email address
    async fn get_by_email(&self, ctx: &Context, email: &str) -> RepoResult<Option<User>>;

    /// Replace name and email of an existing user. `created_at` is kept and
    /// `updated_at` refreshed. Returns the stored record.
    async fn update(&self, ctx: &Context, user: User) -> RepoResult<User>;

    /// Remove user by ID
    async fn delete(&self, ctx: &Context, id: &str) -> RepoResult<()>;

    /// List users in id order
    async fn list(&self, ctx: &Context, limit: i64, offset: i64) -> RepoResult<Vec<User>>;
}

/// Relational implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translate a driver error into a repository error kind.
fn map_db_err(err: DbErr) -> RepositoryError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return RepositoryError::AlreadyExists;
    }
    match err {
        DbErr::RecordNotUpdated => RepositoryError::NotFound,
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepositoryError::unavailable(err),
        _ => RepositoryError::internal(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, ctx: &Context, mut user: User) -> RepoResult<User> {
        user.prepare_for_insert(now(), generate_user_id);

        ctx.run(async move {
            let active_model = ActiveModel {
                id: Set(user.id),
                email: Set(user.email),
                name: Set(user.name),
                created_at: Set(user.created_at),
                updated_at: Set(user.updated_at),
            };

            let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
            Ok(User::from(model))
        })
        .await
    }

    async fn get_by_id(&self, ctx: &Context, id: &str) -> RepoResult<Option<User>> {
        ctx.run(async {
            let result = UserEntity::find_by_id(id.to_owned())
                .one(&self.db)
                .await
                .map_err(map_db_err)?;

            Ok(result.map(User::from))
        })
        .await
    }

    async fn get_by_email(&self, ctx: &Context, email: &str) -> RepoResult<Option<User>> {
        ctx.run(async {
            let result = UserEntity::find()
                .filter(user::Column::Email.eq(email))
                .one(&self.db)
                .await
                .map_err(map_db_err)?;

            Ok(result.map(User::from))
        })
        .await
    }

    async fn update(&self, ctx: &Context, mut user: User) -> RepoResult<User> {
        ctx.run(async move {
            let existing = UserEntity::find_by_id(user.id.clone())
                .one(&self.db)
                .await
                .map_err(map_db_err)?
                .ok_or(RepositoryError::NotFound)?;

            user.stamp_update(&User::from(existing.clone()), now());

            let mut active: ActiveModel = existing.into();
            active.email = Set(user.email);
            active.name = Set(user.name);
            active.updated_at = Set(user.updated_at);

            // Zero affected rows (deleted in between) surfaces as RecordNotUpdated
            let model = active.update(&self.db).await.map_err(map_db_err)?;
            Ok(User::from(model))
        })
        .await
    }

    async fn delete(&self, ctx: &Context, id: &str) -> RepoResult<()> {
        ctx.run(async {
            let result = UserEntity::delete_by_id(id.to_owned())
                .exec(&self.db)
                .await
                .map_err(map_db_err)?;

            if result.rows_affected == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
        .await
    }

    async fn list(&self, ctx: &Context, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let window = ListWindow::new(limit, offset);
        if window.is_empty() {
            ctx.check()?;
            return Ok(Vec::new());
        }

        ctx.run(async {
            let models = UserEntity::find()
                .order_by_asc(user::Column::Id)
                .limit(window.limit)
                .offset(window.offset)
                .all(&self.db)
                .await
                .map_err(map_db_err)?;

            Ok(models.into_iter().map(User::from).collect())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ErrorKind;
    use sea_orm::RuntimeErr;

    #[test]
    fn connection_errors_are_unavailable() {
        let err = map_db_err(DbErr::Conn(RuntimeErr::Internal("refused".into())));
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn record_not_updated_is_not_found() {
        assert_eq!(map_db_err(DbErr::RecordNotUpdated).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn other_errors_are_internal() {
        let err = map_db_err(DbErr::Custom("weird".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
