use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use super::{OrderId, ProductId, ProductSummary, UserId, UserSummary};

/// Lifecycle status of an order.
///
/// Forward moves follow `Pending → Confirmed → Processing → Shipped → Delivered`
/// and may skip steps. `Cancelled` is reachable from every non-terminal
/// status. Nothing leaves `Delivered` or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Verb used in error messages, e.g. "cannot cancel order".
    pub fn verb(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "reopen",
            OrderStatus::Confirmed => "confirm",
            OrderStatus::Processing => "process",
            OrderStatus::Shipped => "ship",
            OrderStatus::Delivered => "deliver",
            OrderStatus::Cancelled => "cancel",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    fn rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Processing => Some(2),
            OrderStatus::Shipped => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(current), Some(next)) => next > current,
            (None, Some(_)) => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Upi,
    NetBanking,
    Cod,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::NetBanking => "net_banking",
            PaymentMethod::Cod => "cod",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cod
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_country() -> String {
    "United States".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Purchased line, frozen at creation time.
///
/// Name, price and image are copies: later edits or deletion of the product
/// do not reach the order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: f64,
    pub name: String,
    pub image: String,
}

/// Money fields of an order, computed from the item snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub tax: f64,
    pub total_price: f64,
}

pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

impl OrderTotals {
    pub fn compute(items: &[OrderItem], shipping_fee: f64, tax_rate: f64) -> Self {
        let subtotal = round_cents(items.iter().map(|item| item.price * f64::from(item.quantity)).sum());
        let tax = round_cents(subtotal * tax_rate);
        Self {
            subtotal,
            shipping_fee,
            tax,
            total_price: round_cents(subtotal + shipping_fee + tax),
        }
    }

    /// True when every field agrees with `other` to the cent.
    pub fn agrees_with(&self, other: &OrderTotals) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() < 0.005;
        close(self.subtotal, other.subtotal)
            && close(self.shipping_fee, other.shipping_fee)
            && close(self.tax, other.tax)
            && close(self.total_price, other.total_price)
    }
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub contact_info: ContactInfo,
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub tax: f64,
    pub total_price: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub order_date: DateTime<Utc>,
    pub confirmed_date: Option<DateTime<Utc>>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub delivered_date: Option<DateTime<Utc>>,
    pub cancelled_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for persisting a new order. Built by the order client after
/// stock has been reserved.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub contact_info: ContactInfo,
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub tracking_number: Option<String>,
}

/// One requested line of a checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price the customer saw. Informational; the live product price wins.
    #[serde(default)]
    pub price: Option<f64>,
}

/// Checkout body as posted by the storefront.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub shipping_address: ShippingAddress,
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Totals computed by the client, compared against the server's own.
    #[serde(flatten)]
    pub quoted: Option<OrderTotals>,
}

impl CheckoutRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err("Order must contain at least one item".to_string());
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(format!("Quantity for {} must be at least 1", item.product_id));
        }
        let address = &self.shipping_address;
        let required = [
            ("shipping name", &address.name),
            ("shipping phone", &address.phone),
            ("street", &address.street),
            ("city", &address.city),
            ("state", &address.state),
            ("zip code", &address.zip_code),
            ("country", &address.country),
            ("contact name", &self.contact_info.name),
            ("contact email", &self.contact_info.email),
            ("contact phone", &self.contact_info.phone),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(format!("Missing {}", field));
        }
        if !self.contact_info.email.contains('@') {
            return Err(format!("Invalid contact email: {}", self.contact_info.email));
        }
        Ok(())
    }
}

/// An order item next to the live product it references, if that still exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    #[serde(flatten)]
    pub item: OrderItem,
    pub product: Option<ProductSummary>,
}

/// An order with its product references expanded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<UserSummary>,
    /// Products whose stock could not be put back when this order was
    /// cancelled. Empty outside of a cancellation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unrestocked: Vec<ProductId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_graph_moves_forward_and_cancels_from_open_states() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Shipped));
        assert!(Processing.can_transition_to(Delivered));
        assert!(Shipped.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Confirmed));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("shipped".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert_eq!("refunded".parse::<OrderStatus>(), Err("refunded".to_string()));
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn totals_are_computed_from_snapshots() {
        let items = vec![
            OrderItem { product_id: ProductId(1), quantity: 2, price: 10.0, name: "A".into(), image: String::new() },
            OrderItem { product_id: ProductId(2), quantity: 3, price: 0.99, name: "B".into(), image: String::new() },
        ];
        let totals = OrderTotals::compute(&items, 5.99, 0.1);
        assert_eq!(totals.subtotal, 22.97);
        assert_eq!(totals.tax, 2.3);
        assert_eq!(totals.total_price, 31.26);
    }

    #[test]
    fn checkout_body_deserializes_and_validates() {
        let body = r#"{
            "items": [{"productId": 1, "quantity": 2, "price": 10}],
            "shippingAddress": {"name": "Ada", "phone": "555", "street": "1 Main",
                                "city": "Springfield", "state": "IL", "zipCode": "62701"},
            "contactInfo": {"name": "Ada", "email": "ada@example.com", "phone": "555"},
            "subtotal": 20, "shippingFee": 5.99, "tax": 2, "totalPrice": 27.99,
            "paymentMethod": "cod"
        }"#;
        let request: CheckoutRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.shipping_address.country, "United States");
        assert_eq!(request.payment_method, PaymentMethod::Cod);
        assert_eq!(request.quoted.map(|q| q.total_price), Some(27.99));
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn checkout_rejects_zero_quantity_and_blank_fields() {
        let mut request = CheckoutRequest {
            items: vec![CheckoutItem { product_id: ProductId(1), quantity: 0, price: None }],
            shipping_address: ShippingAddress {
                name: "Ada".into(),
                phone: "555".into(),
                street: "1 Main".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip_code: "62701".into(),
                country: default_country(),
            },
            contact_info: ContactInfo { name: "Ada".into(), email: "ada@example.com".into(), phone: "555".into() },
            payment_method: PaymentMethod::Cod,
            quoted: None,
        };
        assert!(request.validate().unwrap_err().contains("at least 1"));

        request.items[0].quantity = 1;
        request.shipping_address.city = "  ".into();
        assert_eq!(request.validate(), Err("Missing city".to_string()));
    }
}
