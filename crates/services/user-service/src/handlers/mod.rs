//! HTTP handlers.

mod health_handler;
mod user_handler;

pub use health_handler::{api_root, health_check, health_routes, method_not_allowed, not_found};
pub use user_handler::{
    create_user, delete_user, get_user, list_users, update_user, user_routes, CreateUserRequest,
    ListQuery, UpdateUserRequest,
};
