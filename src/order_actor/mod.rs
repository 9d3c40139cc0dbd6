//! Order records and their status machine.

mod actions;
pub mod entity;
pub mod error;
pub mod numbering;

pub use actions::*;
pub use error::*;
pub use numbering::ReferenceGenerator;
