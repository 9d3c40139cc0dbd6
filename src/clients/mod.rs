//! Cloneable handles onto the stores. The order client is the lifecycle
//! service: it composes the others.

#[macro_use]
mod macros;

pub mod cart_client;
pub mod order_client;
pub mod product_client;
pub mod user_client;

pub use cart_client::CartClient;
pub use order_client::{Access, OrderClient};
pub use product_client::{ProductClient, ProductQuery};
pub use user_client::UserClient;
