use crate::actor_framework::Entity;
use crate::domain::{Cart, CartItem, UserId};
use super::actions::CartAction;
use super::error::CartError;

impl Entity for Cart {
    type Id = UserId;
    type CreateParams = ();
    type Patch = ();
    type Action = CartAction;
    type ActionResult = Cart;
    type Error = CartError;

    fn id(&self) -> &UserId {
        &self.user_id
    }

    fn from_create_params(user_id: UserId, _params: ()) -> Result<Self, CartError> {
        Ok(Cart::empty(user_id))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), CartError> {
        Ok(())
    }

    /// Applies a line-item change and returns the cart with fresh totals.
    fn handle_action(&mut self, action: CartAction) -> Result<Cart, CartError> {
        match action {
            CartAction::AddItem { quantity: 0, .. } => return Err(CartError::InvalidQuantity(0)),
            CartAction::AddItem { product_id, quantity, price } => {
                match self.items.iter_mut().find(|item| item.product_id == product_id) {
                    Some(existing) => {
                        existing.quantity = existing
                            .quantity
                            .checked_add(quantity)
                            .ok_or(CartError::InvalidQuantity(quantity))?;
                    }
                    None => self.items.push(CartItem { product_id, quantity, price }),
                }
            }
            CartAction::SetQuantity { product_id, quantity } => {
                let position = self
                    .items
                    .iter()
                    .position(|item| item.product_id == product_id)
                    .ok_or_else(|| CartError::ItemNotInCart(product_id.to_string()))?;
                if quantity == 0 {
                    self.items.remove(position);
                } else {
                    self.items[position].quantity = quantity;
                }
            }
            CartAction::RemoveItem(product_id) => {
                self.items.retain(|item| item.product_id != product_id);
            }
            CartAction::Clear => self.items.clear(),
        }
        self.recalculate();
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductId;

    #[test]
    fn adding_the_same_product_merges_lines() {
        let mut cart = Cart::empty(UserId(1));
        let add = |quantity, price| CartAction::AddItem { product_id: ProductId(9), quantity, price };
        cart.handle_action(add(1, 4.0)).unwrap();
        let cart = cart.handle_action(add(2, 5.0)).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.items[0].price, 4.0);
        assert_eq!(cart.total_price, 12.0);
    }

    #[test]
    fn set_quantity_zero_removes_and_unknown_item_fails() {
        let mut cart = Cart::empty(UserId(1));
        cart.handle_action(CartAction::AddItem { product_id: ProductId(1), quantity: 2, price: 1.5 }).unwrap();

        let err = cart.handle_action(CartAction::SetQuantity { product_id: ProductId(2), quantity: 1 }).unwrap_err();
        assert_eq!(err, CartError::ItemNotInCart("product_2".into()));

        let cart = cart.handle_action(CartAction::SetQuantity { product_id: ProductId(1), quantity: 0 }).unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_items, 0);
    }

    #[test]
    fn merging_past_u32_max_is_rejected() {
        let mut cart = Cart::empty(UserId(1));
        let add = |quantity| CartAction::AddItem { product_id: ProductId(1), quantity, price: 1.0 };
        cart.handle_action(add(u32::MAX)).unwrap();
        assert_eq!(cart.handle_action(add(1)).unwrap_err(), CartError::InvalidQuantity(1));
        assert_eq!(cart.items[0].quantity, u32::MAX);
    }

    #[test]
    fn clear_resets_totals() {
        let mut cart = Cart::empty(UserId(1));
        cart.handle_action(CartAction::AddItem { product_id: ProductId(1), quantity: 2, price: 1.5 }).unwrap();
        let cart = cart.handle_action(CartAction::Clear).unwrap();
        assert_eq!((cart.total_items, cart.total_price), (0, 0.0));
    }
}
