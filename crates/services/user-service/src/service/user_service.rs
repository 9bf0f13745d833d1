//! User service - Handles user-related business logic.
//!
//! Validates input, turns missing records into `NotFound` and logs outcomes.
//! The repository underneath never logs.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

use common::{AppError, AppResult, OptionExt};
use domain::{validate_email, validate_name, User};

use crate::context::Context;
use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user from an email and display name
    async fn create_user(&self, ctx: &Context, email: String, name: String) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, ctx: &Context, id: &str) -> AppResult<User>;

    /// Update the supplied (non-empty) fields of a user
    async fn update_user(
        &self,
        ctx: &Context,
        id: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<User>;

    /// Delete user by ID
    async fn delete_user(&self, ctx: &Context, id: &str) -> AppResult<()>;

    /// List a page of users
    async fn list_users(&self, ctx: &Context, limit: i64, offset: i64) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

/// Treat blank optional fields as "not supplied".
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, ctx: &Context, email: String, name: String) -> AppResult<User> {
        info!(email = %email, "Creating new user");

        let email = email.trim().to_string();
        let name = name.trim().to_string();
        validate_email(&email)?;
        validate_name(&name)?;

        if self.repo.get_by_email(ctx, &email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let user = self
            .repo
            .create(ctx, User::new(email, name))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to create user");
                AppError::from(e)
            })?;

        info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    async fn get_user(&self, ctx: &Context, id: &str) -> AppResult<User> {
        debug!(user_id = %id, "Getting user by ID");

        self.repo
            .get_by_id(ctx, id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to get user by ID");
                AppError::from(e)
            })?
            .ok_or_not_found("User")
    }

    async fn update_user(
        &self,
        ctx: &Context,
        id: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<User> {
        info!(user_id = %id, "Updating user");

        let name = non_empty(name);
        let email = non_empty(email);
        if let Some(ref name) = name {
            validate_name(name)?;
        }
        if let Some(ref email) = email {
            validate_email(email)?;
        }

        let mut user = self.get_user(ctx, id).await?;
        if let Some(name) = name {
            user.update_name(name);
        }
        if let Some(email) = email {
            user.update_email(email);
        }

        let user = self.repo.update(ctx, user).await.map_err(|e| {
            error!(error = %e, "Failed to update user");
            AppError::from(e)
        })?;

        info!(user_id = %user.id, "User updated successfully");
        Ok(user)
    }

    async fn delete_user(&self, ctx: &Context, id: &str) -> AppResult<()> {
        info!(user_id = %id, "Deleting user");

        self.repo.delete(ctx, id).await.map_err(|e| {
            error!(error = %e, "Failed to delete user");
            AppError::from(e)
        })?;

        info!(user_id = %id, "User deleted successfully");
        Ok(())
    }

    async fn list_users(&self, ctx: &Context, limit: i64, offset: i64) -> AppResult<Vec<User>> {
        debug!(limit, offset, "Listing users");

        self.repo.list(ctx, limit, offset).await.map_err(|e| {
            error!(error = %e, "Failed to list users");
            AppError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockUserRepository, RepositoryError};
    use chrono::Utc;
    use mockall::predicate::eq;

    fn create_test_user(id: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockUserRepository) -> UserManager {
        UserManager::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .withf(|_, id| id == "user_1")
            .returning(|_, id| Ok(Some(create_test_user(id))));

        let result = service(repo).get_user(&Context::background(), "user_1").await;

        assert_eq!(result.unwrap().id, "user_1");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id().returning(|_, _| Ok(None));

        let result = service(repo).get_user(&Context::background(), "missing").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_user_store_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(|_, _| Err(RepositoryError::internal("boom")));

        let result = service(repo).get_user(&Context::background(), "user_1").await;

        assert!(matches!(result.unwrap_err(), AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_create_user_validates_input() {
        let repo = MockUserRepository::new();
        let svc = service(repo);
        let ctx = Context::background();

        let err = svc.create_user(&ctx, "".into(), "A".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "email is required"));

        let err = svc.create_user(&ctx, "a@x.com".into(), "  ".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "name is required"));
    }

    #[tokio::test]
    async fn test_create_user_conflict_on_existing_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .withf(|_, email| email == "a@x.com")
            .returning(|_, _| Ok(Some(create_test_user("user_1"))));
        repo.expect_create().never();

        let err = service(repo)
            .create_user(&Context::background(), "a@x.com".into(), "A".into())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email().returning(|_, _| Ok(None));
        repo.expect_create()
            .withf(|_, user| user.email == "a@x.com" && user.name == "A" && user.id.is_empty())
            .returning(|_, mut user| {
                user.id = "user_1".to_string();
                Ok(user)
            });

        let user = service(repo)
            .create_user(&Context::background(), " a@x.com ".into(), "A".into())
            .await
            .unwrap();

        assert_eq!(user.id, "user_1");
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_create_user_race_maps_to_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email().returning(|_, _| Ok(None));
        repo.expect_create()
            .returning(|_, _| Err(RepositoryError::AlreadyExists));

        let err = service(repo)
            .create_user(&Context::background(), "a@x.com".into(), "A".into())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_user_only_overwrites_supplied_fields() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(|_, id| Ok(Some(create_test_user(id))));
        repo.expect_update()
            .withf(|_, user| user.name == "Renamed" && user.email == "test@example.com")
            .returning(|_, user| Ok(user));

        let user = service(repo)
            .update_user(
                &Context::background(),
                "user_1",
                Some("Renamed".into()),
                Some("".into()),
            )
            .await
            .unwrap();

        assert_eq!(user.name, "Renamed");
        assert_eq!(user.email, "test@example.com");
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id().returning(|_, _| Ok(None));
        repo.expect_update().never();

        let err = service(repo)
            .update_user(&Context::background(), "missing", Some("X".into()), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let err = service(repo)
            .delete_user(&Context::background(), "missing")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_users_passes_window_through() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .with(mockall::predicate::always(), eq(5), eq(10))
            .returning(|_, _, _| Ok(vec![create_test_user("a"), create_test_user("b")]));

        let users = service(repo)
            .list_users(&Context::background(), 5, 10)
            .await
            .unwrap();

        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_deadline_maps_to_unavailable() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .returning(|_, _, _| Err(RepositoryError::DeadlineExceeded));

        let err = service(repo)
            .list_users(&Context::background(), 5, 0)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }
}
