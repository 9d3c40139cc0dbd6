//! Read-side helpers: filtering, pagination and statistics over snapshots
//! listed from a store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::config::PaginationConfig;
use crate::domain::{Order, OrderStatus, PaymentMethod, UserId};
use crate::domain::order::round_cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Requested page, 1-based. Missing or zero values fall back to the defaults
/// and the limit is capped at `max_limit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page: Some(page), limit: Some(limit) }
    }

    fn resolve(&self, config: &PaginationConfig) -> (usize, usize) {
        let page = self.page.filter(|page| *page > 0).unwrap_or(1);
        let limit = self
            .limit
            .filter(|limit| *limit > 0)
            .unwrap_or(config.default_limit)
            .min(config.max_limit);
        (page, limit)
    }
}

/// Slices already-sorted items into the requested page.
pub fn paginate<T>(items: Vec<T>, request: PageRequest, config: &PaginationConfig) -> Page<T> {
    let (page, limit) = request.resolve(config);
    let total = items.len();
    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();
    Page {
        items,
        pagination: Pagination {
            total,
            page,
            limit,
            pages: total.div_ceil(limit),
        },
    }
}

/// Admin listing filter. Date bounds are inclusive on `order_date`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub user_id: Option<UserId>,
    pub status: Option<OrderStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: PageRequest,
}

impl OrderQuery {
    pub fn for_user(user_id: UserId, page: PageRequest) -> Self {
        Self { user_id: Some(user_id), page, ..Default::default() }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.user_id.map_or(true, |user| order.user_id == user)
            && self.status.map_or(true, |status| order.status == status)
            && self.payment_method.map_or(true, |method| order.payment_method == method)
            && self.start_date.map_or(true, |start| order.order_date >= start)
            && self.end_date.map_or(true, |end| order.order_date <= end)
    }
}

/// Filters, sorts newest first and paginates.
pub fn select_orders(orders: Vec<Order>, query: &OrderQuery, config: &PaginationConfig) -> Page<Order> {
    let mut matching: Vec<Order> = orders.into_iter().filter(|order| query.matches(order)).collect();
    // Order ids break ties so equal timestamps still list deterministically.
    matching.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
    paginate(matching, query.page, config)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistics {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub confirmed_orders: usize,
    pub processing_orders: usize,
    pub shipped_orders: usize,
    pub delivered_orders: usize,
    pub cancelled_orders: usize,
    /// Sum of `total_price` over orders that are not cancelled.
    pub total_revenue: f64,
}

impl OrderStatistics {
    pub fn collect<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut stats = Self::default();
        let mut revenue = 0.0;
        for order in orders {
            stats.total_orders += 1;
            let bucket = match order.status {
                OrderStatus::Pending => &mut stats.pending_orders,
                OrderStatus::Confirmed => &mut stats.confirmed_orders,
                OrderStatus::Processing => &mut stats.processing_orders,
                OrderStatus::Shipped => &mut stats.shipped_orders,
                OrderStatus::Delivered => &mut stats.delivered_orders,
                OrderStatus::Cancelled => &mut stats.cancelled_orders,
            };
            *bucket += 1;
            if order.status != OrderStatus::Cancelled {
                revenue += order.total_price;
            }
        }
        stats.total_revenue = round_cents(revenue);
        stats
    }

    pub fn bucket_sum(&self) -> usize {
        self.pending_orders
            + self.confirmed_orders
            + self.processing_orders
            + self.shipped_orders
            + self.delivered_orders
            + self.cancelled_orders
    }
}
