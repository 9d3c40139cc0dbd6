//! Customer records: owners of orders, with a unique email and a wishlist.

mod actions;
pub mod entity;
pub mod error;

pub use actions::UserAction;
pub use error::*;
