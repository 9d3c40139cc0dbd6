use chrono::{DateTime, Utc};
use crate::domain::{Order, OrderStatus, UserId};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Admin move to `to`, checked against the status graph.
    ///
    /// `tracking_candidate` is assigned when shipping an order that has no
    /// tracking number yet, and ignored otherwise.
    Transition {
        to: OrderStatus,
        at: DateTime<Utc>,
        notes: Option<String>,
        tracking_candidate: Option<String>,
    },
    /// Customer cancellation. Only the owner may cancel, and never once the
    /// order is delivered or already cancelled.
    Cancel { requested_by: UserId, at: DateTime<Utc> },
}

#[derive(Debug, Clone)]
pub enum OrderActionResult {
    Transitioned { previous: OrderStatus, order: Order },
}
