use tracing::{debug, info, instrument};
use crate::actor_framework::ResourceClient;
use crate::cart_actor::{CartAction, CartError};
use crate::clients::ProductClient;
use crate::domain::{Cart, ProductId, UserId};

/// Client for interacting with the Cart actor.
///
/// Carts are created on first use. Adds and quantity changes check the live
/// product first; the stock itself is only taken at checkout.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
    product_client: ProductClient,
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>, product_client: ProductClient) -> Self {
        Self { inner, product_client }
    }

    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.inner.get_or_create(user_id, ()).await.map_err(CartError::from)
    }

    async fn apply(&self, user_id: UserId, action: CartAction) -> Result<Cart, CartError> {
        self.inner.get_or_create(user_id, ()).await?;
        self.inner.perform_action(user_id, action).await.map_err(CartError::from)
    }

    /// Fails with `InsufficientStock` when the line's combined quantity would
    /// exceed the product's current stock.
    async fn ensure_available(&self, product_id: ProductId, wanted: u32) -> Result<f64, CartError> {
        let product = self
            .product_client
            .get_product(product_id)
            .await?
            .ok_or_else(|| CartError::ProductNotFound(product_id.to_string()))?;
        if product.stock < wanted {
            return Err(CartError::InsufficientStock {
                product: product.name,
                requested: wanted,
                available: product.stock,
            });
        }
        Ok(product.price)
    }

    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, user_id: UserId, product_id: ProductId, quantity: u32) -> Result<Cart, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        let in_cart = self.get_cart(user_id).await?.item(product_id).map_or(0, |item| item.quantity);
        let wanted = in_cart.checked_add(quantity).ok_or(CartError::InvalidQuantity(quantity))?;
        let price = self.ensure_available(product_id, wanted).await?;
        let cart = self.apply(user_id, CartAction::AddItem { product_id, quantity, price }).await?;
        info!(total_items = cart.total_items, "Item added to cart");
        Ok(cart)
    }

    /// Sets a line's quantity. Zero removes the line.
    #[instrument(skip(self))]
    pub async fn update_cart_item(&self, user_id: UserId, product_id: ProductId, quantity: u32) -> Result<Cart, CartError> {
        if quantity > 0 {
            self.ensure_available(product_id, quantity).await?;
        }
        self.apply(user_id, CartAction::SetQuantity { product_id, quantity }).await
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, user_id: UserId, product_id: ProductId) -> Result<Cart, CartError> {
        self.apply(user_id, CartAction::RemoveItem(product_id)).await
    }

    /// Empties an existing cart.
    ///
    /// # Errors
    /// `NotFound` if the user has never had a cart.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: UserId) -> Result<Cart, CartError> {
        let cart = self.inner.perform_action(user_id, CartAction::Clear).await?;
        info!("Cart cleared");
        Ok(cart)
    }

    /// Empties the cart if there is one. Used after checkout.
    pub async fn clear_if_present(&self, user_id: UserId) -> Result<(), CartError> {
        match self.clear_cart(user_id).await {
            Ok(_) | Err(CartError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
