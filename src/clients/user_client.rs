use std::collections::HashMap;
use tracing::{debug, info, instrument};
use crate::actor_framework::ResourceClient;
use crate::clients::ProductClient;
use crate::domain::{ProductId, ProductSummary, User, UserCreate, UserId, UserPatch};
use crate::user_actor::{UserAction, UserError};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
    product_client: ProductClient,
}

impl_client_methods!(UserClient, User, UserError, user);

impl UserClient {
    pub fn new(inner: ResourceClient<User>, product_client: ProductClient) -> Self {
        Self { inner, product_client }
    }

    /// # Errors
    /// `AlreadyExists` when another user holds the same email, ignoring case.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create_user(&self, user: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        self.inner.create(user).await.map_err(UserError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(UserError::from)
    }

    /// Every registered user. Used to expand customer details in listings.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        debug!("Sending request");
        self.inner.list().await.map_err(UserError::from)
    }

    /// Saves a product for later. The product must exist.
    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&self, id: UserId, product_id: ProductId) -> Result<Vec<ProductId>, UserError> {
        if self.product_client.get_product(product_id).await?.is_none() {
            return Err(UserError::ProductNotFound(product_id.to_string()));
        }
        let wishlist = self.inner.perform_action(id, UserAction::AddToWishlist(product_id)).await?;
        info!(size = wishlist.len(), "Product added to wishlist");
        Ok(wishlist)
    }

    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(&self, id: UserId, product_id: ProductId) -> Result<Vec<ProductId>, UserError> {
        let wishlist = self.inner.perform_action(id, UserAction::RemoveFromWishlist(product_id)).await?;
        info!(size = wishlist.len(), "Product removed from wishlist");
        Ok(wishlist)
    }

    /// The wishlist with live product details, in the order saved. Products
    /// deleted since are left out.
    #[instrument(skip(self))]
    pub async fn get_wishlist(&self, id: UserId) -> Result<Vec<ProductSummary>, UserError> {
        let user = self
            .get_user(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        let products: HashMap<ProductId, ProductSummary> = self
            .product_client
            .all_products()
            .await?
            .iter()
            .map(|product| (product.id, product.summary()))
            .collect();
        Ok(user.wishlist.iter().filter_map(|product_id| products.get(product_id).cloned()).collect())
    }
}
