//! Carts

pub mod errors;
pub mod locks;
pub mod models;
pub mod repository;
pub mod service;

pub use errors::{CartsServiceError, Collaborator};
pub use repository::{CartsRepository, InMemoryCartsRepository, RepositoryError};
pub use service::*;
