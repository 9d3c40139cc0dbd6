//! Catalog products and their stock. Stock moves only through
//! reserve/restore actions, so every change is a single actor message.

mod actions;
pub mod entity;
pub mod error;

pub use actions::{ProductAction, ProductActionResult};
pub use error::ProductError;
