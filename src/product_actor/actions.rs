use crate::domain::ProductSnapshot;

/// Custom actions for Product entities.
///
/// Stock only changes through these actions, and each runs as one message
/// on the product actor, so checking and changing the level cannot be
/// interleaved with another checkout.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Decrements stock by the given quantity if enough is available.
    ///
    /// # Errors
    /// Fails with `InsufficientStock` and leaves stock unchanged when the
    /// requested amount exceeds the current level.
    ReserveStock(u32),
    /// Adds the given quantity back, reversing an earlier reservation.
    RestoreStock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone)]
pub enum ProductActionResult {
    CheckStock(u32),
    /// The product as it was when the reservation succeeded, and the stock left.
    ReserveStock { snapshot: ProductSnapshot, remaining: u32 },
    RestoreStock(u32),
}
