//! Per-user carts. Line items change only through cart actions, and every
//! action recomputes the totals before it returns.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
