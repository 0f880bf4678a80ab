//! Records - Typed rows of the four business tables
//!
//! Column names match the CSV headers one to one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Customer master data (`customers.csv`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Primary key, e.g. `CUST_001`
    pub customer_id: String,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Sales region
    pub region: String,
}

/// Product catalog entry (`products.csv`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Primary key, e.g. `PROD_001`
    pub product_id: String,
    /// Product name
    pub name: String,
    /// Product category
    pub category: String,
    /// Unit price
    pub price: f64,
    /// Units in stock
    pub stock_level: i64,
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderStatus {
    /// Order placed, not yet processed
    Pending,
    /// Order being prepared
    Processing,
    /// Handed to the carrier
    Shipped,
    /// On the last leg of delivery
    OutForDelivery,
    /// Delivered to the customer
    Delivered,
    /// Cancelled before delivery
    Cancelled,
}

impl OrderStatus {
    /// Returns the display string used in the CSV files
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Snake-case machine identifier (`out_for_delivery`)
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the order can still be delivered late
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" | "intransit" => Ok(Self::Shipped),
            "outfordelivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("unknown order status: {s}")),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Order bridging customers and products (`orders.csv`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Primary key, e.g. `ORD_1001`
    pub order_id: String,
    /// Ordering customer
    pub customer_id: String,
    /// Ordered product
    pub product_id: String,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Date the order was placed
    pub order_date: NaiveDate,
    /// Estimated delivery date; unparsable values load as `None`
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub est_delivery: Option<NaiveDate>,
}

impl Order {
    /// Days past the estimated delivery as of `today`, if the order is late
    #[must_use]
    pub fn days_overdue(&self, today: NaiveDate) -> Option<i64> {
        if !self.status.is_open() {
            return None;
        }
        let est = self.est_delivery?;
        let days = (today - est).num_days();
        (days > 0).then_some(days)
    }
}

/// Financial transaction linked to an order (`revenue.csv`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    /// Primary key
    pub revenue_id: String,
    /// Order the payment belongs to
    pub order_id: String,
    /// Amount paid
    pub amount: f64,
    /// Payment date
    pub date: NaiveDate,
    /// Payment method (card, paypal, ...)
    pub payment_method: String,
}
