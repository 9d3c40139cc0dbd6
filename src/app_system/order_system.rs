use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{error, info};
use crate::actor_framework::ResourceActor;
use crate::clients::{CartClient, OrderClient, ProductClient, UserClient};
use crate::config::AppConfig;
use crate::domain::{Cart, Order, OrderId, Product, ProductId, User, UserId};
use super::error::SystemError;

/// Returns an ID generator counting up from 1.
fn sequence<Id: From<u32> + 'static>() -> impl Fn() -> Id + Send + Sync + 'static {
    let counter = Arc::new(AtomicU32::new(1));
    move || Id::from(counter.fetch_add(1, Ordering::SeqCst))
}

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub cart_client: CartClient,
    pub user_client: UserClient,
    pub product_client: ProductClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns every actor on the current runtime.
    pub fn new(config: AppConfig) -> Self {
        let config = Arc::new(config);
        let buffer = config.channel_buffer;

        // 1. Products
        let (product_actor, product_resource_client) = ResourceActor::<Product>::new(buffer, sequence::<ProductId>());
        let product_client = ProductClient::new(product_resource_client, config.pagination.clone());
        let product_handle = tokio::spawn(product_actor.run());

        // 2. Users, whose wishlists point at products
        let (user_actor, user_resource_client) = ResourceActor::<User>::new(buffer, sequence::<UserId>());
        let user_client = UserClient::new(user_resource_client, product_client.clone());
        let user_handle = tokio::spawn(user_actor.run());

        // 3. Carts, keyed by their owner
        let (cart_actor, cart_resource_client) = ResourceActor::<Cart>::keyed(buffer);
        let cart_client = CartClient::new(cart_resource_client, product_client.clone());
        let cart_handle = tokio::spawn(cart_actor.run());

        // 4. Orders
        let (order_actor, order_resource_client) = ResourceActor::<Order>::new(buffer, sequence::<OrderId>());
        let order_client = OrderClient::new(
            order_resource_client,
            user_client.clone(),
            product_client.clone(),
            cart_client.clone(),
            Arc::clone(&config),
        );
        let order_handle = tokio::spawn(order_actor.run());

        info!(buffer, "Order system started");
        Self {
            order_client,
            cart_client,
            user_client,
            product_client,
            handles: vec![user_handle, product_handle, cart_handle, order_handle],
        }
    }

    /// Drops every client, which closes the channels, then waits for the
    /// actors to drain and stop. Clones held elsewhere keep their actor alive.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        drop(self.order_client);
        drop(self.cart_client);
        drop(self.user_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
