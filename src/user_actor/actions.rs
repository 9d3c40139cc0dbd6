use crate::domain::ProductId;

/// Wishlist changes. Both return the wishlist as it is afterwards.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Appends the product; a product already listed is rejected.
    AddToWishlist(ProductId),
    /// Drops the product if listed. Removing an absent product is not an error.
    RemoveFromWishlist(ProductId),
}
