use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use crate::actor_framework::ResourceClient;
use crate::clients::{CartClient, ProductClient, UserClient};
use crate::config::AppConfig;
use crate::domain::{
    CheckoutRequest, Order, OrderCreate, OrderDetails, OrderId, OrderItem, OrderLine, OrderPatch,
    OrderStatus, OrderTotals, ProductId, ProductSummary, UserId, UserSummary,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError, ReferenceGenerator};
use crate::product_actor::ProductError;
use crate::query::{select_orders, OrderQuery, OrderStatistics, Page, PageRequest};

/// Who is asking for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// A customer, who only sees their own orders.
    User(UserId),
    Admin,
}

impl Access {
    fn permits(&self, order: &Order) -> bool {
        match self {
            Access::User(user_id) => order.user_id == *user_id,
            Access::Admin => true,
        }
    }
}

/// Client for interacting with the Order actor.
///
/// This is the order lifecycle service. Checkout reserves stock item by item
/// on the product actor and hands every reservation back if a later step
/// fails, so a rejected checkout leaves inventory as it found it. Status
/// changes run as single actions on the order actor; the one that moves an
/// order to `cancelled` is the only one that restocks, which makes the
/// restock happen exactly once.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    product_client: ProductClient,
    cart_client: CartClient,
    config: Arc<AppConfig>,
    order_numbers: Arc<ReferenceGenerator>,
    tracking_numbers: Arc<ReferenceGenerator>,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        product_client: ProductClient,
        cart_client: CartClient,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            inner,
            user_client,
            product_client,
            cart_client,
            config,
            order_numbers: Arc::new(ReferenceGenerator::orders()),
            tracking_numbers: Arc::new(ReferenceGenerator::tracking()),
        }
    }

    /// Places an order for `user_id`.
    ///
    /// # Errors
    /// `ValidationError`, `UnsupportedPaymentMethod`, `UserNotFound`,
    /// `ProductNotFound` or `InsufficientStock`. On any of them no order
    /// exists and stock is unchanged.
    #[instrument(skip(self, request), fields(user_id = %user_id, items = request.items.len()))]
    pub async fn create_order(&self, user_id: UserId, request: CheckoutRequest) -> Result<OrderDetails, OrderError> {
        info!("Processing create_order request");
        request.validate().map_err(OrderError::ValidationError)?;
        if !self.config.accepts(request.payment_method) {
            return Err(OrderError::UnsupportedPaymentMethod(request.payment_method));
        }

        // Step 1: Validate user
        let user = self
            .user_client
            .get_user(user_id)
            .await
            .map_err(|e| OrderError::from_user("create order", e))?;
        if user.is_none() {
            error!("User not found");
            return Err(OrderError::UserNotFound(user_id.to_string()));
        }

        // Step 2: Reserve stock, item by item
        let mut items: Vec<OrderItem> = Vec::with_capacity(request.items.len());
        for line in &request.items {
            match self.product_client.reserve_stock(line.product_id, line.quantity).await {
                Ok((snapshot, _remaining)) => {
                    if let Some(quoted) = line.price {
                        if (quoted - snapshot.price).abs() >= 0.005 {
                            warn!(product_id = %line.product_id, quoted, price = snapshot.price, "Quoted price differs, using current price");
                        }
                    }
                    items.push(OrderItem {
                        product_id: line.product_id,
                        quantity: line.quantity,
                        price: snapshot.price,
                        name: snapshot.name,
                        image: snapshot.image,
                    });
                }
                Err(e) => {
                    error!(product_id = %line.product_id, quantity = line.quantity, error = %e, "Stock reservation failed");
                    self.restock(&items).await;
                    return Err(OrderError::from_product("create order", e));
                }
            }
        }

        // Step 3: Price the order from the snapshots
        let pricing = &self.config.pricing;
        let totals = OrderTotals::compute(&items, pricing.shipping_fee, pricing.tax_rate);
        if let Some(quoted) = request.quoted.filter(|quoted| !quoted.agrees_with(&totals)) {
            warn!(quoted = quoted.total_price, computed = totals.total_price, "Quoted totals differ, using computed totals");
        }

        // Step 4: Persist
        let params = OrderCreate {
            user_id,
            order_number: self.order_numbers.next(),
            items: items.clone(),
            shipping_address: request.shipping_address,
            contact_info: request.contact_info,
            totals,
            payment_method: request.payment_method,
            placed_at: Utc::now(),
        };
        let order_number = params.order_number.clone();
        let order_id = match self.inner.create(params).await {
            Ok(id) => id,
            Err(e) => {
                let err = OrderError::from_framework("create order", e);
                error!(error = %err, "Order could not be stored");
                self.restock(&items).await;
                return Err(err);
            }
        };
        info!(order_id = %order_id, order_number = %order_number, total = totals.total_price, "Order placed");

        // Step 5: Clear the cart. The order stands even if this fails.
        if let Err(e) = self.cart_client.clear_if_present(user_id).await {
            warn!(error = %e, "Failed to clear cart after checkout");
        }

        let order = self.fetch(order_id, Access::User(user_id), "create order").await?;
        self.expand_one(order, false).await
    }

    /// Returns the order if `access` may see it. Someone else's order is
    /// reported as `NotFound`.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId, access: Access) -> Result<OrderDetails, OrderError> {
        let order = self.fetch(id, access, "get order").await?;
        self.expand_one(order, access == Access::Admin).await
    }

    #[instrument(skip(self))]
    pub async fn get_order_by_number(&self, order_number: &str, access: Access) -> Result<OrderDetails, OrderError> {
        let order = self
            .all_orders("get order")
            .await?
            .into_iter()
            .find(|order| order.order_number == order_number && access.permits(order))
            .ok_or_else(|| OrderError::NotFound(order_number.to_string()))?;
        self.expand_one(order, access == Access::Admin).await
    }

    /// The customer's own orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_user_orders(&self, user_id: UserId, page: PageRequest) -> Result<Page<OrderDetails>, OrderError> {
        let query = OrderQuery::for_user(user_id, page);
        let selected = select_orders(self.all_orders("list orders").await?, &query, &self.config.pagination);
        let items = self.expand(selected.items, false).await?;
        Ok(Page { items, pagination: selected.pagination })
    }

    /// Admin listing with the customer of each order expanded.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: OrderQuery) -> Result<Page<OrderDetails>, OrderError> {
        let selected = select_orders(self.all_orders("list orders").await?, &query, &self.config.pagination);
        let items = self.expand(selected.items, true).await?;
        Ok(Page { items, pagination: selected.pagination })
    }

    /// Admin status change.
    ///
    /// # Errors
    /// `InvalidStatus` for an unknown status name, before anything changes.
    /// `InvalidTransition` when the status graph does not allow the move.
    #[instrument(skip(self, notes), fields(order_id = %id, status = %status))]
    pub async fn update_status(&self, id: OrderId, status: &str, notes: Option<String>) -> Result<OrderDetails, OrderError> {
        let to: OrderStatus = status.parse().map_err(OrderError::InvalidStatus)?;
        let tracking_candidate = (to == OrderStatus::Shipped).then(|| self.tracking_numbers.next());
        let action = OrderAction::Transition { to, at: Utc::now(), notes, tracking_candidate };
        let OrderActionResult::Transitioned { previous, order } = self
            .inner
            .perform_action(id, action)
            .await
            .map_err(|e| OrderError::from_framework("update order status", e))?;
        info!(%previous, tracking_number = ?order.tracking_number, "Order status updated");

        let unrestocked = if to == OrderStatus::Cancelled { self.restock(&order.items).await } else { Vec::new() };
        let mut details = self.expand_one(order, true).await?;
        details.unrestocked = unrestocked;
        Ok(details)
    }

    /// Admin edit of the tracking number.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn update_tracking(&self, id: OrderId, tracking_number: String) -> Result<Order, OrderError> {
        let order = self
            .inner
            .update(id, OrderPatch { tracking_number: Some(tracking_number) })
            .await
            .map_err(|e| OrderError::from_framework("update tracking number", e))?;
        info!(tracking_number = ?order.tracking_number, "Tracking number updated");
        Ok(order)
    }

    /// Customer cancellation of their own order.
    #[instrument(skip(self), fields(order_id = %id, user_id = %user_id))]
    pub async fn cancel_order(&self, id: OrderId, user_id: UserId) -> Result<OrderDetails, OrderError> {
        let action = OrderAction::Cancel { requested_by: user_id, at: Utc::now() };
        let OrderActionResult::Transitioned { previous, order } = self
            .inner
            .perform_action(id, action)
            .await
            .map_err(|e| OrderError::from_framework("cancel order", e))?;
        info!(%previous, "Order cancelled by customer");

        let unrestocked = self.restock(&order.items).await;
        let mut details = self.expand_one(order, false).await?;
        details.unrestocked = unrestocked;
        Ok(details)
    }

    #[instrument(skip(self))]
    pub async fn statistics(&self) -> Result<OrderStatistics, OrderError> {
        let orders = self.all_orders("get order statistics").await?;
        Ok(OrderStatistics::collect(&orders))
    }

    async fn fetch(&self, id: OrderId, access: Access, operation: &'static str) -> Result<Order, OrderError> {
        self.inner
            .get(id)
            .await
            .map_err(|e| OrderError::from_framework(operation, e))?
            .filter(|order| access.permits(order))
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    async fn all_orders(&self, operation: &'static str) -> Result<Vec<Order>, OrderError> {
        self.inner.list().await.map_err(|e| OrderError::from_framework(operation, e))
    }

    /// Puts the quantities of `items` back into stock, best effort. Products
    /// deleted in the meantime are skipped. Returns the products whose
    /// restore failed for any other reason; the caller's outcome stands.
    async fn restock(&self, items: &[OrderItem]) -> Vec<ProductId> {
        let mut failed = Vec::new();
        for item in items {
            match self.product_client.restore_stock(item.product_id, item.quantity).await {
                Ok(stock) => {
                    info!(product_id = %item.product_id, quantity = item.quantity, stock, "Stock restored")
                }
                Err(ProductError::NotFound(_)) => {
                    debug!(product_id = %item.product_id, "Product no longer exists, skipping restock")
                }
                Err(e) => {
                    error!(product_id = %item.product_id, quantity = item.quantity, error = %e, "Failed to restore stock");
                    failed.push(item.product_id);
                }
            }
        }
        failed
    }

    async fn expand_one(&self, order: Order, with_customer: bool) -> Result<OrderDetails, OrderError> {
        let mut expanded = self.expand(vec![order], with_customer).await?;
        expanded
            .pop()
            .ok_or_else(|| OrderError::storage("expand order", "no order to expand"))
    }

    /// Attaches live product summaries, and customer summaries when asked,
    /// with one listing per store for the whole batch.
    async fn expand(&self, orders: Vec<Order>, with_customers: bool) -> Result<Vec<OrderDetails>, OrderError> {
        let products: HashMap<ProductId, ProductSummary> = self
            .product_client
            .all_products()
            .await
            .map_err(|e| OrderError::from_product("load products", e))?
            .iter()
            .map(|product| (product.id, product.summary()))
            .collect();
        let customers: HashMap<UserId, UserSummary> = if with_customers {
            self.user_client
                .list_users()
                .await
                .map_err(|e| OrderError::from_user("load users", e))?
                .iter()
                .map(|user| (user.id, UserSummary::from(user)))
                .collect()
        } else {
            HashMap::new()
        };

        Ok(orders
            .into_iter()
            .map(|order| {
                let lines = order
                    .items
                    .iter()
                    .map(|item| OrderLine { item: item.clone(), product: products.get(&item.product_id).cloned() })
                    .collect();
                let customer = customers.get(&order.user_id).cloned();
                OrderDetails { order, lines, customer, unrestocked: Vec::new() }
            })
            .collect())
    }
}
