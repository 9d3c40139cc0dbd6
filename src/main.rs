use tracing::{info, warn, Instrument};
use order_lifecycle::app_system::{setup_tracing, OrderSystem, SystemError};
use order_lifecycle::config::AppConfig;
use order_lifecycle::domain::{
    Category, CheckoutItem, CheckoutRequest, ContactInfo, PaymentMethod, ProductCreate, ShippingAddress, UserCreate,
};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = AppConfig::from_env()?;
    info!(shipping_fee = config.pricing.shipping_fee, tax_rate = config.pricing.tax_rate, "Starting order system");
    let system = OrderSystem::new(config);

    let user_id = async {
        info!("Creating test user");
        system.user_client.create_user(UserCreate::new("Alice Liddell", "alice@example.com")).await
    }
    .instrument(tracing::info_span!("user_creation"))
    .await?;

    let product = ProductCreate::new("Desk Lamp", 24.5, Category::Furniture, 5)
        .with_image("lamp.png")
        .with_description("Adjustable LED desk lamp");
    let product_id = async {
        info!("Creating test product");
        system.product_client.create_product(product).await
    }
    .instrument(tracing::info_span!("product_creation"))
    .await?;

    system.cart_client.add_to_cart(user_id, product_id, 2).await?;

    let request = CheckoutRequest {
        items: vec![CheckoutItem { product_id, quantity: 2, price: Some(24.5) }],
        shipping_address: ShippingAddress {
            name: "Alice Liddell".to_string(),
            phone: "555-0100".to_string(),
            street: "1 Rabbit Hole".to_string(),
            city: "Oxford".to_string(),
            state: "OX".to_string(),
            zip_code: "OX1 1AA".to_string(),
            country: "United Kingdom".to_string(),
        },
        contact_info: ContactInfo {
            name: "Alice Liddell".to_string(),
            email: "alice@example.com".to_string(),
            phone: "555-0100".to_string(),
        },
        payment_method: PaymentMethod::Cod,
        quoted: None,
    };

    let span = tracing::info_span!("order_lifecycle", user_id = %user_id);
    async {
        let placed = system.order_client.create_order(user_id, request).await?;
        let order_id = placed.order.id;
        info!(order_number = %placed.order.order_number, total = placed.order.total_price, "Order placed");
        println!("{}", serde_json::to_string_pretty(&placed)?);

        let shipped = system.order_client.update_status(order_id, "shipped", Some("Left the warehouse".to_string())).await?;
        info!(tracking_number = ?shipped.order.tracking_number, "Order shipped");

        let cancelled = system.order_client.cancel_order(order_id, user_id).await?;
        println!("{}", serde_json::to_string_pretty(&cancelled)?);

        if let Err(e) = system.order_client.cancel_order(order_id, user_id).await {
            warn!(error = %e, "Second cancellation rejected");
        }

        let stock = system.product_client.check_stock(product_id).await?;
        let stats = system.order_client.statistics().await?;
        info!(stock, "Stock after cancellation");
        println!("{}", serde_json::to_string_pretty(&stats)?);
        Ok::<(), SystemError>(())
    }
    .instrument(span)
    .await?;

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
