//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Every store implementation and the service layer share these types.

pub mod constants;
pub mod error;
pub mod pagination;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use pagination::ListWindow;
pub use user::{generate_user_id, validate_email, validate_name, User};
