use chrono::{DateTime, Utc};
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderId, OrderPatch, OrderStatus};
use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;

impl Order {
    /// Moves to `to`, stamping the matching lifecycle date. Callers check the
    /// transition first.
    fn apply_status(&mut self, to: OrderStatus, at: DateTime<Utc>, tracking_candidate: Option<String>) {
        self.status = to;
        match to {
            OrderStatus::Confirmed => self.confirmed_date = Some(at),
            OrderStatus::Shipped => {
                self.shipped_date = Some(at);
                if self.tracking_number.is_none() {
                    self.tracking_number = tracking_candidate;
                }
            }
            OrderStatus::Delivered => self.delivered_date = Some(at),
            OrderStatus::Cancelled => self.cancelled_date = Some(at),
            OrderStatus::Pending | OrderStatus::Processing => {}
        }
        self.updated_at = at;
    }
}

impl Entity for Order {
    type Id = OrderId;
    type CreateParams = OrderCreate;
    type Patch = OrderPatch;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Creates a pending order from reserved item snapshots.
    ///
    /// # Notes
    /// Money fields come from `params.totals`, which the order client
    /// computes from the snapshots.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::ValidationError("Order must contain at least one item".to_string()));
        }
        if params.order_number.is_empty() {
            return Err(OrderError::ValidationError("Order number is required".to_string()));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            order_number: params.order_number,
            items: params.items,
            shipping_address: params.shipping_address,
            contact_info: params.contact_info,
            subtotal: params.totals.subtotal,
            shipping_fee: params.totals.shipping_fee,
            tax: params.totals.tax,
            total_price: params.totals.total_price,
            payment_method: params.payment_method,
            status: OrderStatus::Pending,
            tracking_number: None,
            notes: None,
            order_date: params.placed_at,
            confirmed_date: None,
            shipped_date: None,
            delivered_date: None,
            cancelled_date: None,
            updated_at: params.placed_at,
        })
    }

    /// Sets the tracking number.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), OrderError> {
        if let Some(tracking_number) = patch.tracking_number {
            let tracking_number = tracking_number.trim();
            if tracking_number.is_empty() {
                return Err(OrderError::ValidationError("Tracking number is required".to_string()));
            }
            self.tracking_number = Some(tracking_number.to_string());
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    fn check_unique(&self, other: &Self) -> Result<(), OrderError> {
        if self.order_number == other.order_number {
            return Err(OrderError::ValidationError(format!("Duplicate order number: {}", self.order_number)));
        }
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        let previous = self.status;
        match action {
            OrderAction::Transition { to, at, notes, tracking_candidate } => {
                if !previous.can_transition_to(to) {
                    return Err(OrderError::InvalidTransition { from: previous, to });
                }
                self.apply_status(to, at, tracking_candidate);
                if let Some(notes) = notes.filter(|notes| !notes.trim().is_empty()) {
                    self.notes = Some(notes);
                }
            }
            OrderAction::Cancel { requested_by, at } => {
                // Someone else's order looks the same as a missing one.
                if self.user_id != requested_by {
                    return Err(OrderError::NotFound(self.id.to_string()));
                }
                if previous.is_terminal() {
                    return Err(OrderError::InvalidTransition { from: previous, to: OrderStatus::Cancelled });
                }
                self.apply_status(OrderStatus::Cancelled, at, None);
            }
        }
        Ok(OrderActionResult::Transitioned { previous, order: self.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ContactInfo, OrderItem, OrderTotals, PaymentMethod, ProductId, ShippingAddress, UserId,
    };

    fn pending_order() -> Order {
        let items = vec![OrderItem {
            product_id: ProductId(1),
            quantity: 2,
            price: 10.0,
            name: "Lamp".into(),
            image: "lamp.png".into(),
        }];
        let params = OrderCreate {
            user_id: UserId(1),
            order_number: "ORD-TEST-ABCDEF".into(),
            totals: OrderTotals::compute(&items, 5.99, 0.1),
            items,
            shipping_address: ShippingAddress {
                name: "Ada".into(),
                phone: "555".into(),
                street: "1 Main".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip_code: "62701".into(),
                country: "United States".into(),
            },
            contact_info: ContactInfo { name: "Ada".into(), email: "ada@example.com".into(), phone: "555".into() },
            payment_method: PaymentMethod::Cod,
            placed_at: Utc::now(),
        };
        Order::from_create_params(OrderId(1), params).unwrap()
    }

    fn transition(to: OrderStatus, tracking: Option<&str>) -> OrderAction {
        OrderAction::Transition {
            to,
            at: Utc::now(),
            notes: None,
            tracking_candidate: tracking.map(String::from),
        }
    }

    #[test]
    fn shipping_assigns_tracking_only_once() {
        let mut order = pending_order();
        order.handle_action(transition(OrderStatus::Shipped, Some("TRK-1-AAAAAA"))).unwrap();
        assert_eq!(order.tracking_number.as_deref(), Some("TRK-1-AAAAAA"));
        assert!(order.shipped_date.is_some());
        assert_eq!(order.total_price, 27.99);

        let mut preset = pending_order();
        preset.on_update(OrderPatch { tracking_number: Some("UPS-42".into()) }).unwrap();
        preset.handle_action(transition(OrderStatus::Shipped, Some("TRK-2-BBBBBB"))).unwrap();
        assert_eq!(preset.tracking_number.as_deref(), Some("UPS-42"));
    }

    #[test]
    fn backwards_and_terminal_transitions_are_rejected() {
        let mut order = pending_order();
        order.handle_action(transition(OrderStatus::Delivered, None)).unwrap();
        let err = order.handle_action(transition(OrderStatus::Shipped, None)).unwrap_err();
        assert_eq!(err, OrderError::InvalidTransition { from: OrderStatus::Delivered, to: OrderStatus::Shipped });
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(order.shipped_date.is_none());
    }

    #[test]
    fn notes_overwrite_only_when_present() {
        let mut order = pending_order();
        let confirm = OrderAction::Transition {
            to: OrderStatus::Confirmed,
            at: Utc::now(),
            notes: Some("Called customer".into()),
            tracking_candidate: None,
        };
        order.handle_action(confirm).unwrap();
        order.handle_action(transition(OrderStatus::Processing, None)).unwrap();
        assert_eq!(order.notes.as_deref(), Some("Called customer"));
        assert!(order.confirmed_date.is_some());
    }

    #[test]
    fn customer_cancel_checks_owner_and_status() {
        let mut order = pending_order();
        let cancel = |user| OrderAction::Cancel { requested_by: UserId(user), at: Utc::now() };

        assert_eq!(order.handle_action(cancel(2)).unwrap_err(), OrderError::NotFound("order_1".into()));

        match order.handle_action(cancel(1)).unwrap() {
            OrderActionResult::Transitioned { previous, order } => {
                assert_eq!(previous, OrderStatus::Pending);
                assert_eq!(order.status, OrderStatus::Cancelled);
                assert!(order.cancelled_date.is_some());
            }
        }

        let err = order.handle_action(cancel(1)).unwrap_err();
        assert_eq!(err.to_string(), "Cannot cancel order with status: cancelled");
    }

    #[test]
    fn blank_tracking_number_is_rejected() {
        let mut order = pending_order();
        let err = order.on_update(OrderPatch { tracking_number: Some("  ".into()) }).unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)));
        assert!(order.tracking_number.is_none());
    }

    #[test]
    fn order_numbers_must_differ() {
        let first = pending_order();
        let mut second = pending_order();
        second.id = OrderId(2);
        let err = second.check_unique(&first).unwrap_err();
        assert_eq!(err.to_string(), "Order validation error: Duplicate order number: ORD-TEST-ABCDEF");

        second.order_number = "ORD-TEST-GHIJKL".into();
        assert!(second.check_unique(&first).is_ok());
    }
}
