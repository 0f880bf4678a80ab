//! Analytics - Aggregations and delivery summaries over the store
//!
//! Aggregations work on one fact per order: the order joined with its
//! customer, product and the sum of its revenue records.

use crate::records::{Order, OrderStatus};
use crate::store::DataStore;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label used when a join finds no matching row
const UNKNOWN: &str = "Unknown";

/// Number of delayed orders listed in a delay report
pub const DELAY_SAMPLE_SIZE: usize = 3;

/// Measured quantity of an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Sum of revenue amounts
    Revenue,
    /// Number of orders
    OrderCount,
    /// Revenue divided by the number of paid orders
    AverageOrderValue,
}

impl Metric {
    /// All metrics, in declaration order
    pub const ALL: [Metric; 3] = [Self::Revenue, Self::OrderCount, Self::AverageOrderValue];

    /// Machine identifier
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::OrderCount => "order_count",
            Self::AverageOrderValue => "average_order_value",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" | "total_revenue" | "sales" => Ok(Self::Revenue),
            "order_count" | "orders" | "count" => Ok(Self::OrderCount),
            "average_order_value" | "aov" => Ok(Self::AverageOrderValue),
            _ => Err(format!(
                "unknown metric '{s}' (expected one of: revenue, order_count, average_order_value)"
            )),
        }
    }
}

/// Grouping key of an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Customer region
    Region,
    /// Product category
    Category,
    /// Order status
    Status,
    /// Payment method of the first revenue record
    PaymentMethod,
    /// Customer name
    Customer,
    /// Product name
    Product,
    /// Order month (`YYYY-MM`)
    Month,
}

impl Dimension {
    /// All dimensions, in declaration order
    pub const ALL: [Dimension; 7] = [
        Self::Region,
        Self::Category,
        Self::Status,
        Self::PaymentMethod,
        Self::Customer,
        Self::Product,
        Self::Month,
    ];

    /// Machine identifier
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Category => "category",
            Self::Status => "status",
            Self::PaymentMethod => "payment_method",
            Self::Customer => "customer",
            Self::Product => "product",
            Self::Month => "month",
        }
    }
}

impl std::str::FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(Dimension::as_str).collect();
                format!("unknown dimension '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// One group of an aggregation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Group label (`"total"` when ungrouped)
    pub key: String,
    /// Metric value, rounded to cents
    pub value: f64,
    /// Orders contributing to the group
    pub orders: usize,
}

struct OrderFact<'a> {
    order: &'a Order,
    amount: f64,
    paid: bool,
    payment_method: &'a str,
}

impl DataStore {
    /// Aggregate `metric` over orders, optionally grouped and filtered by status
    ///
    /// Rows are sorted by value (descending), then key.
    #[must_use]
    pub fn aggregate(
        &self,
        metric: Metric,
        group_by: Option<Dimension>,
        status: Option<OrderStatus>,
    ) -> Vec<AggregateRow> {
        let mut groups: BTreeMap<String, (f64, usize, usize)> = BTreeMap::new();

        for fact in self.order_facts(status) {
            let key = match group_by {
                Some(dimension) => self.dimension_label(&fact, dimension),
                None => "total".to_string(),
            };
            let entry = groups.entry(key).or_insert((0.0, 0, 0));
            entry.0 += fact.amount;
            entry.1 += 1;
            if fact.paid {
                entry.2 += 1;
            }
        }

        let mut rows: Vec<AggregateRow> = groups
            .into_iter()
            .map(|(key, (amount, orders, paid))| {
                let value = match metric {
                    Metric::Revenue => amount,
                    Metric::OrderCount => orders as f64,
                    Metric::AverageOrderValue if paid > 0 => amount / paid as f64,
                    Metric::AverageOrderValue => 0.0,
                };
                AggregateRow {
                    key,
                    value: round_cents(value),
                    orders,
                }
            })
            .collect();

        rows.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
        rows
    }

    /// Delivery situation of one customer as of `today`
    #[must_use]
    pub fn delivery_summary(&self, customer_id: &str, today: NaiveDate) -> DeliverySummary {
        let orders = self.orders_for_customer(customer_id);
        if orders.is_empty() {
            return DeliverySummary::NoOrders;
        }

        let delayed: Vec<String> = orders
            .iter()
            .filter(|o| o.days_overdue(today).is_some())
            .map(|o| o.order_id.clone())
            .collect();
        if !delayed.is_empty() {
            return DeliverySummary::Delayed { order_ids: delayed };
        }

        let in_progress = orders.iter().filter(|o| o.status.is_open()).count();
        if in_progress > 0 {
            DeliverySummary::OnTrack { in_progress }
        } else {
            DeliverySummary::Completed
        }
    }

    /// Store-wide delayed-order report as of `today`
    #[must_use]
    pub fn delay_report(&self, today: NaiveDate) -> DelayReport {
        let delayed = self.delayed_orders(today);
        let sample = delayed
            .iter()
            .take(DELAY_SAMPLE_SIZE)
            .map(|o| DelayedOrder {
                order_id: o.order_id.clone(),
                customer_id: o.customer_id.clone(),
                status: o.status,
                est_delivery: o.est_delivery,
                days_overdue: o.days_overdue(today).unwrap_or_default(),
            })
            .collect();
        DelayReport {
            as_of: today,
            total: delayed.len(),
            sample,
        }
    }

    fn order_facts(&self, status: Option<OrderStatus>) -> impl Iterator<Item = OrderFact<'_>> {
        self.orders()
            .iter()
            .filter(move |o| status.map_or(true, |s| o.status == s))
            .map(|order| {
                let payments = self.revenue_for_order(&order.order_id);
                OrderFact {
                    order,
                    amount: payments.iter().map(|r| r.amount).sum(),
                    paid: !payments.is_empty(),
                    payment_method: payments
                        .first()
                        .map_or(UNKNOWN, |r| r.payment_method.as_str()),
                }
            })
    }

    fn dimension_label(&self, fact: &OrderFact<'_>, dimension: Dimension) -> String {
        let order = fact.order;
        match dimension {
            Dimension::Region => self
                .customer(&order.customer_id)
                .map_or(UNKNOWN.to_string(), |c| c.region.clone()),
            Dimension::Category => self
                .product(&order.product_id)
                .map_or(UNKNOWN.to_string(), |p| p.category.clone()),
            Dimension::Status => order.status.as_str().to_string(),
            Dimension::PaymentMethod => fact.payment_method.to_string(),
            Dimension::Customer => self
                .customer(&order.customer_id)
                .map_or_else(|| order.customer_id.clone(), |c| c.name.clone()),
            Dimension::Product => self
                .product(&order.product_id)
                .map_or_else(|| order.product_id.clone(), |p| p.name.clone()),
            Dimension::Month => format!("{:04}-{:02}", order.order_date.year(), order.order_date.month()),
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Delivery situation of a single customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeliverySummary {
    /// The customer has never ordered
    NoOrders,
    /// At least one open order is past its estimated delivery
    Delayed {
        /// Late orders, in file order
        order_ids: Vec<String>,
    },
    /// Orders are in progress and none is late
    OnTrack {
        /// Number of open orders
        in_progress: usize,
    },
    /// Every order is delivered or cancelled
    Completed,
}

impl DeliverySummary {
    /// Notification text shown to the customer at login
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NoOrders => "You have no orders yet.".to_string(),
            Self::Delayed { order_ids } => format!(
                "Delayed: {} order(s) past the estimated delivery date ({}). We apologize for the inconvenience.",
                order_ids.len(),
                order_ids.join(", ")
            ),
            Self::OnTrack { in_progress } => {
                format!("On track: {in_progress} order(s) in progress, none delayed.")
            }
            Self::Completed => "All your orders have been completed.".to_string(),
        }
    }

    /// Whether the customer should be alerted
    #[must_use]
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Delayed { .. })
    }
}

/// One late order in a [`DelayReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedOrder {
    /// Order id
    pub order_id: String,
    /// Ordering customer
    pub customer_id: String,
    /// Current status
    pub status: OrderStatus,
    /// Missed delivery date
    pub est_delivery: Option<NaiveDate>,
    /// Days past the estimated delivery
    pub days_overdue: i64,
}

/// Store-wide delayed orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayReport {
    /// Reference date
    pub as_of: NaiveDate,
    /// Number of delayed orders
    pub total: usize,
    /// First few delayed orders
    pub sample: Vec<DelayedOrder>,
}

impl DelayReport {
    /// One-line status for the audit board
    #[must_use]
    pub fn summary(&self) -> String {
        if self.total == 0 {
            return "No critical delays.".to_string();
        }
        let ids: Vec<&str> = self.sample.iter().map(|d| d.order_id.as_str()).collect();
        let customers: Vec<&str> = self.sample.iter().map(|d| d.customer_id.as_str()).collect();
        format!(
            "{} delayed order(s). Orders: {}. Affected customers: {}",
            self.total,
            ids.join(", "),
            customers.join(", ")
        )
    }
}
