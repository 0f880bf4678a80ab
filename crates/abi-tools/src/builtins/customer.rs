//! Customer tools - order lookups scoped to one customer
//!
//! Every tool here binds `customer_id` as its subject parameter, so the
//! registry refuses calls naming anyone but the signed-in customer.

use super::{order_view, parse_input, BuiltinsConfig};
use crate::error::Result;
use crate::registry::{ParamType, ParameterSpec, Role, Tool, ToolSpec};
use abi_data::{normalize_id, DataStore};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

const CUSTOMER_ID_DESC: &str = "ID of the signed-in customer, e.g. 'CUST_001'";

fn customer_id_param() -> ParameterSpec {
    ParameterSpec::required("customer_id", ParamType::String, CUSTOMER_ID_DESC)
}

fn not_found(customer_id: &str) -> Value {
    json!({
        "found": false,
        "customer_id": customer_id,
        "message": format!("No customer found with ID {customer_id}."),
    })
}

#[derive(Debug, Deserialize)]
struct CustomerInput {
    customer_id: String,
}

/// Lists every order of the signed-in customer
pub struct GetCustomerOrdersTool {
    spec: ToolSpec,
    data: Arc<DataStore>,
    config: BuiltinsConfig,
}

impl GetCustomerOrdersTool {
    /// Create the tool
    #[must_use]
    pub fn new(data: Arc<DataStore>, config: BuiltinsConfig) -> Self {
        let spec = ToolSpec::new(
            "get_customer_orders",
            "Get all orders of the signed-in customer with status, dates, product details and delay flags.",
        )
        .with_parameter(customer_id_param())
        .allow(Role::Customer)
        .with_subject("customer_id");
        Self { spec, data, config }
    }
}

#[async_trait::async_trait]
impl Tool for GetCustomerOrdersTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<Value> {
        let input: CustomerInput = parse_input(&self.spec.name, arguments)?;
        let id = normalize_id(&input.customer_id);

        let Some(customer) = self.data.customer(&id) else {
            debug!(customer_id = %id, "Customer not found");
            return Ok(not_found(&id));
        };

        let today = self.config.today();
        let orders: Vec<Value> = self
            .data
            .orders_for_customer(&id)
            .into_iter()
            .map(|o| order_view(&self.data, o, today))
            .collect();

        Ok(json!({
            "found": true,
            "customer": {
                "customer_id": customer.customer_id,
                "name": customer.name,
                "email": customer.email,
                "region": customer.region,
            },
            "order_count": orders.len(),
            "orders": orders,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct OrderStatusInput {
    customer_id: String,
    #[serde(default)]
    order_id: Option<String>,
}

/// Status of one order, or of the most recent order when none is named
pub struct GetOrderStatusTool {
    spec: ToolSpec,
    data: Arc<DataStore>,
    config: BuiltinsConfig,
}

impl GetOrderStatusTool {
    /// Create the tool
    #[must_use]
    pub fn new(data: Arc<DataStore>, config: BuiltinsConfig) -> Self {
        let spec = ToolSpec::new(
            "get_order_status",
            "Get the status of one order of the signed-in customer. Without order_id, returns the most recent order.",
        )
        .with_parameter(customer_id_param())
        .with_parameter(ParameterSpec::optional(
            "order_id",
            ParamType::String,
            "Order to look up, e.g. 'ORD_1001'",
        ))
        .allow(Role::Customer)
        .with_subject("customer_id");
        Self { spec, data, config }
    }
}

#[async_trait::async_trait]
impl Tool for GetOrderStatusTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<Value> {
        let input: OrderStatusInput = parse_input(&self.spec.name, arguments)?;
        let customer_id = normalize_id(&input.customer_id);
        if self.data.customer(&customer_id).is_none() {
            return Ok(not_found(&customer_id));
        }

        let order = match &input.order_id {
            // Orders of other customers are reported as missing
            Some(order_id) => self
                .data
                .order(order_id)
                .filter(|o| normalize_id(&o.customer_id) == customer_id),
            None => self
                .data
                .orders_for_customer(&customer_id)
                .into_iter()
                .max_by_key(|o| o.order_date),
        };

        Ok(match order {
            Some(order) => json!({
                "found": true,
                "customer_id": customer_id,
                "order": order_view(&self.data, order, self.config.today()),
            }),
            None => {
                let message = match &input.order_id {
                    Some(order_id) => format!(
                        "No order {} found for customer {customer_id}.",
                        normalize_id(order_id)
                    ),
                    None => format!("Customer {customer_id} has no orders."),
                };
                json!({
                    "found": false,
                    "customer_id": customer_id,
                    "message": message,
                })
            }
        })
    }
}

/// Delivery notification for the signed-in customer
pub struct CheckDeliveryAlertsTool {
    spec: ToolSpec,
    data: Arc<DataStore>,
    config: BuiltinsConfig,
}

impl CheckDeliveryAlertsTool {
    /// Create the tool
    #[must_use]
    pub fn new(data: Arc<DataStore>, config: BuiltinsConfig) -> Self {
        let spec = ToolSpec::new(
            "check_delivery_alerts",
            "Check whether any order of the signed-in customer is past its estimated delivery date.",
        )
        .with_parameter(customer_id_param())
        .allow(Role::Customer)
        .with_subject("customer_id");
        Self { spec, data, config }
    }
}

#[async_trait::async_trait]
impl Tool for CheckDeliveryAlertsTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<Value> {
        let input: CustomerInput = parse_input(&self.spec.name, arguments)?;
        let customer_id = normalize_id(&input.customer_id);
        if self.data.customer(&customer_id).is_none() {
            return Ok(not_found(&customer_id));
        }

        let summary = self.data.delivery_summary(&customer_id, self.config.today());
        Ok(json!({
            "found": true,
            "customer_id": customer_id,
            "alert": summary.is_alert(),
            "message": summary.message(),
            "summary": summary,
        }))
    }
}
