use serde::{Deserialize, Serialize};
use super::{ProductId, UserId};

/// Represents a registered customer.
///
/// Authentication lives outside this crate; the store keeps what orders need
/// to check an owner and show who placed an order, plus the wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub fullname: String,
    /// Lowercase, and unique across the store.
    pub email: String,
    /// Saved products, oldest first, without duplicates.
    #[serde(default)]
    pub wishlist: Vec<ProductId>,
}

/// Payload for registering a user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub fullname: String,
    pub email: String,
}

/// Payload for updating an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub fullname: Option<String>,
    pub email: Option<String>,
}

/// The customer fields shown next to an order in admin listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub fullname: String,
    pub email: String,
}

impl UserCreate {
    pub fn new(fullname: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            fullname: fullname.into(),
            email: email.into(),
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname.clone(),
            email: user.email.clone(),
        }
    }
}
