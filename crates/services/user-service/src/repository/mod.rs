//! Repository layer for data access.
//!
//! `UserRepository` is the contract; `UserStore` (SeaORM) and
//! `InMemoryUserStore` are interchangeable implementations of it.

pub mod entities;
mod error;
mod memory;
mod user_repository;

pub use error::{ErrorKind, RepoResult, RepositoryError};
pub use memory::InMemoryUserStore;
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
