use thiserror::Error;
use crate::actor_framework::FrameworkError;
use crate::domain::{OrderStatus, PaymentMethod};
use crate::product_actor::ProductError;
use crate::user_actor::UserError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock { product: String, requested: u32, available: u32 },
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Cannot {} order with status: {from}", .to.verb())]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Unsupported payment method: {0}")]
    UnsupportedPaymentMethod(PaymentMethod),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Failed to {operation}: {reason}")]
    Storage { operation: &'static str, reason: String },
}

impl OrderError {
    pub fn storage(operation: &'static str, reason: impl ToString) -> Self {
        OrderError::Storage { operation, reason: reason.to_string() }
    }

    /// Maps an order-store failure, naming the operation for plumbing errors.
    pub fn from_framework(operation: &'static str, err: FrameworkError<OrderError>) -> Self {
        match err {
            FrameworkError::Entity(e) => e,
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::storage(operation, other),
        }
    }

    pub fn from_product(operation: &'static str, err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => OrderError::ProductNotFound(id),
            ProductError::InsufficientStock { product, requested, available } => {
                OrderError::InsufficientStock { product, requested, available }
            }
            ProductError::InvalidQuantity(quantity) => {
                OrderError::ValidationError(format!("Invalid quantity: {}", quantity))
            }
            ProductError::ValidationError(msg) => OrderError::ValidationError(msg),
            ProductError::ActorCommunicationError(reason) => OrderError::storage(operation, reason),
        }
    }

    pub fn from_user(operation: &'static str, err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => OrderError::UserNotFound(id),
            UserError::ProductNotFound(id) => OrderError::ProductNotFound(id),
            UserError::ActorCommunicationError(reason) => OrderError::storage(operation, reason),
            other @ (UserError::AlreadyExists(_) | UserError::ValidationError(_) | UserError::AlreadyInWishlist(_)) => {
                OrderError::ValidationError(other.to_string())
            }
        }
    }

    /// True for lookups that should surface as "not found" rather than "bad request".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            OrderError::NotFound(_) | OrderError::UserNotFound(_) | OrderError::ProductNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_state() {
        let err = OrderError::InvalidTransition { from: OrderStatus::Delivered, to: OrderStatus::Cancelled };
        assert_eq!(err.to_string(), "Cannot cancel order with status: delivered");

        let err = OrderError::storage("create order", "Actor closed");
        assert_eq!(err.to_string(), "Failed to create order: Actor closed");
        assert!(!err.is_not_found());
    }

    #[test]
    fn product_failures_keep_their_kind() {
        let err = OrderError::from_product(
            "create order",
            ProductError::InsufficientStock { product: "Lamp".into(), requested: 3, available: 1 },
        );
        assert_eq!(err.to_string(), "Insufficient stock for Lamp: requested 3, available 1");

        let err = OrderError::from_product("create order", ProductError::NotFound("product_9".into()));
        assert!(err.is_not_found());

        let err = OrderError::from_framework("cancel order", FrameworkError::ActorDropped);
        assert_eq!(err.to_string(), "Failed to cancel order: Actor dropped");
    }
}
