use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Declares a type-safe numeric identifier that displays as `<prefix>_<n>`.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered customer. Also keys that customer's cart.
    UserId,
    "user"
);
define_id!(
    /// Identifier of a catalog product.
    ProductId,
    "product"
);
define_id!(
    /// Internal identifier of an order record, distinct from its order number.
    OrderId,
    "order"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix_and_serialize_as_numbers() {
        assert_eq!(ProductId(7).to_string(), "product_7");
        assert_eq!(OrderId::from(3).to_string(), "order_3");
        assert_eq!(serde_json::to_string(&UserId(12)).unwrap(), "12");
        let id: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ProductId(42));
    }
}
