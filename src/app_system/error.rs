use thiserror::Error;
use crate::cart_actor::CartError;
use crate::config::ConfigError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;

/// Top-level failure for the binary: any store error, or the system itself.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
