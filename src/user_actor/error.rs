use thiserror::Error;
use crate::actor_framework::FrameworkError;
use crate::product_actor::ProductError;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("Email already registered: {0}")]
    AlreadyExists(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Product already in wishlist: {0}")]
    AlreadyInWishlist(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<UserError>> for UserError {
    fn from(err: FrameworkError<UserError>) -> Self {
        match err {
            FrameworkError::Entity(e) => e,
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            other => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<ProductError> for UserError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => UserError::ProductNotFound(id),
            other => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}
