use crate::domain::ProductId;

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds a line, or increases the quantity of an existing line for the
    /// same product. The price of an existing line is kept.
    AddItem { product_id: ProductId, quantity: u32, price: f64 },
    /// Sets the quantity of an existing line; zero removes it.
    SetQuantity { product_id: ProductId, quantity: u32 },
    RemoveItem(ProductId),
    Clear,
}
