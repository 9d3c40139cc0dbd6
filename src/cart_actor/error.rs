use thiserror::Error;
use crate::actor_framework::FrameworkError;
use crate::product_actor::ProductError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(String),
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock { product: String, requested: u32, available: u32 },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<CartError>> for CartError {
    fn from(err: FrameworkError<CartError>) -> Self {
        match err {
            FrameworkError::Entity(e) => e,
            FrameworkError::NotFound(id) => CartError::NotFound(id),
            other => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<ProductError> for CartError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => CartError::ProductNotFound(id),
            ProductError::InsufficientStock { product, requested, available } => {
                CartError::InsufficientStock { product, requested, available }
            }
            ProductError::InvalidQuantity(quantity) => CartError::InvalidQuantity(quantity),
            other => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}
