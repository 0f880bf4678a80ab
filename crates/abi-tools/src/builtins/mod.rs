//! Builtins - Built-in data-query tools
//!
//! Customer tools (scoped to the signed-in customer):
//! - get_customer_orders, get_order_status, check_delivery_alerts
//!
//! Business tools (company-wide):
//! - get_data_schema, query_business_data, check_revenue_anomalies,
//!   check_critical_delays

mod business;
mod customer;

pub use business::{
    CheckCriticalDelaysTool, CheckRevenueAnomaliesTool, GetDataSchemaTool, QueryBusinessDataTool,
};
pub use customer::{CheckDeliveryAlertsTool, GetCustomerOrdersTool, GetOrderStatusTool};

use crate::error::{Error, Result};
use crate::registry::ToolRegistry;
use abi_data::{DataStore, Order};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Configuration for built-in tools
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinsConfig {
    /// Date used as "today" for delay detection; the local date when unset
    pub reference_date: Option<NaiveDate>,
}

impl BuiltinsConfig {
    /// Pin "today" to a fixed date
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The date delay checks are evaluated against
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Register all built-in tools, customer tools first
///
/// # Errors
///
/// Returns [`Error::DuplicateTool`] if a built-in name is already taken.
pub fn register_builtins(
    registry: &mut ToolRegistry,
    data: Arc<DataStore>,
    config: BuiltinsConfig,
) -> Result<()> {
    // Customer tools
    registry.register(Arc::new(GetCustomerOrdersTool::new(Arc::clone(&data), config)))?;
    registry.register(Arc::new(GetOrderStatusTool::new(Arc::clone(&data), config)))?;
    registry.register(Arc::new(CheckDeliveryAlertsTool::new(Arc::clone(&data), config)))?;

    // Business tools
    registry.register(Arc::new(GetDataSchemaTool::new(Arc::clone(&data))))?;
    registry.register(Arc::new(QueryBusinessDataTool::new(Arc::clone(&data))))?;
    registry.register(Arc::new(CheckRevenueAnomaliesTool::new(Arc::clone(&data))))?;
    registry.register(Arc::new(CheckCriticalDelaysTool::new(data, config)))?;

    Ok(())
}

/// Deserialize validated arguments into a typed input
pub(crate) fn parse_input<T: DeserializeOwned>(tool: &str, arguments: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| Error::handler(tool, format!("invalid input: {e}")))
}

/// JSON view of an order joined with its product
pub(crate) fn order_view(data: &DataStore, order: &Order, today: NaiveDate) -> Value {
    let product = data.product(&order.product_id);
    let days_overdue = order.days_overdue(today);
    serde_json::json!({
        "order_id": order.order_id,
        "status": order.status.as_str(),
        "order_date": order.order_date,
        "est_delivery": order.est_delivery,
        "product_id": order.product_id,
        "product_name": product.map(|p| p.name.as_str()),
        "category": product.map(|p| p.category.as_str()),
        "price": product.map(|p| p.price),
        "is_delayed": days_overdue.is_some(),
        "days_overdue": days_overdue,
    })
}
