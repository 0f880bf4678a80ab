//! ABI Data - Read-only record store
//!
//! This crate provides the data accessor used by the agent's tools:
//! - Records: Typed rows for customers, products, orders and revenue
//! - Store: CSV loading, primary-key indexes and lookups
//! - Analytics: Aggregations, delivery delays and customer delivery summaries
//! - Anomaly: Revenue outlier detection
//!
//! The store is immutable once loaded and is shared between sessions
//! behind an `Arc`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analytics;
pub mod anomaly;
pub mod error;
pub mod records;
pub mod store;

pub use analytics::{AggregateRow, DelayReport, DelayedOrder, DeliverySummary, Dimension, Metric};
pub use anomaly::{AnomalyReport, RevenueAnomaly};
pub use error::{Error, Result};
pub use records::{Customer, Order, OrderStatus, Product, RevenueRecord};
pub use store::{normalize_id, DataStore, SCHEMA_DESCRIPTION};
