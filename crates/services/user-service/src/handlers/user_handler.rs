//! User handlers.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use validator::Validate;

use common::{ApiResponse, AppResult, Created};
use domain::{ListWindow, User};

use crate::extractors::ValidatedJson;
use crate::handlers::method_not_allowed;
use crate::state::AppState;

/// User creation request with validation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "email is invalid"), length(max = 255, message = "email is too long"))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    pub name: String,
}

/// User update request; omitted or empty fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 255, message = "name is too long"))]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "email is too long"))]
    pub email: Option<String>,
}

/// Raw paging parameters; unparsable values fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListQuery {
    fn window(&self) -> ListWindow {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<i64>().ok());
        ListWindow::from_request(parse(&self.limit), parse(&self.offset))
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_users)
                .post(create_user)
                .fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .fallback(method_not_allowed),
        )
}

/// List users page by page
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<User>>> {
    let window = query.window();
    let ctx = state.request_context();
    let users = state
        .users
        .list_users(&ctx, window.limit as i64, window.offset as i64)
        .await?;
    Ok(ApiResponse::success(users))
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<User>> {
    let ctx = state.request_context();
    let user = state
        .users
        .create_user(&ctx, payload.email, payload.name)
        .await?;
    Ok(Created(ApiResponse::with_message(
        user,
        "User created successfully",
    )))
}

/// Get user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<User>> {
    let ctx = state.request_context();
    let user = state.users.get_user(&ctx, &id).await?;
    Ok(ApiResponse::success(user))
}

/// Update name and/or email of a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<User>> {
    let ctx = state.request_context();
    let user = state
        .users
        .update_user(&ctx, &id, payload.name, payload.email)
        .await?;
    Ok(ApiResponse::with_message(user, "User updated successfully"))
}

/// Delete user by ID
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let ctx = state.request_context();
    state.users.delete_user(&ctx, &id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}
