//! Business records. Plain data with no actor concerns.

pub mod ids;
pub mod user;
pub mod product;
pub mod cart;
pub mod order;

pub use ids::*;
pub use user::*;
pub use product::*;
pub use cart::*;
pub use order::*;
