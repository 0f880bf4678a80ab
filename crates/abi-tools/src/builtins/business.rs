//! Business tools - company-wide analytics

use super::{parse_input, BuiltinsConfig};
use crate::error::{Error, Result};
use crate::registry::{ParamType, ParameterSpec, Role, Tool, ToolSpec};
use abi_data::{DataStore, Dimension, Metric, OrderStatus, SCHEMA_DESCRIPTION};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Describes the tables, their columns and relationships
pub struct GetDataSchemaTool {
    spec: ToolSpec,
    data: Arc<DataStore>,
}

impl GetDataSchemaTool {
    /// Create the tool
    #[must_use]
    pub fn new(data: Arc<DataStore>) -> Self {
        let spec = ToolSpec::new(
            "get_data_schema",
            "Describe the business tables (customers, products, orders, revenue), their columns, relationships and row counts.",
        )
        .allow(Role::Business);
        Self { spec, data }
    }
}

#[async_trait::async_trait]
impl Tool for GetDataSchemaTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, _arguments: Map<String, Value>) -> Result<Value> {
        Ok(json!({
            "schema": SCHEMA_DESCRIPTION,
            "row_counts": {
                "customers": self.data.customers().len(),
                "products": self.data.products().len(),
                "orders": self.data.orders().len(),
                "revenue": self.data.revenue().len(),
            },
            "metrics": Metric::ALL.iter().map(Metric::as_str).collect::<Vec<_>>(),
            "dimensions": Dimension::ALL.iter().map(Dimension::as_str).collect::<Vec<_>>(),
        }))
    }
}

#[derive(Debug, Deserialize)]
struct QueryInput {
    metric: String,
    #[serde(default)]
    group_by: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    top_n: Option<i64>,
}

/// Structured aggregation over orders and revenue
pub struct QueryBusinessDataTool {
    spec: ToolSpec,
    data: Arc<DataStore>,
}

impl QueryBusinessDataTool {
    /// Create the tool
    #[must_use]
    pub fn new(data: Arc<DataStore>) -> Self {
        let spec = ToolSpec::new(
            "query_business_data",
            "Aggregate a metric over all orders, optionally grouped by a dimension and filtered by order status. Rows are sorted by value, highest first.",
        )
        .with_parameter(
            ParameterSpec::required("metric", ParamType::String, "Metric to compute")
                .with_allowed_values(Metric::ALL.iter().map(Metric::as_str)),
        )
        .with_parameter(
            ParameterSpec::optional("group_by", ParamType::String, "Dimension to group by")
                .with_allowed_values(Dimension::ALL.iter().map(Dimension::as_str)),
        )
        .with_parameter(ParameterSpec::optional(
            "status",
            ParamType::String,
            "Only include orders with this status (Pending, Processing, Shipped, Out for Delivery, Delivered, Cancelled)",
        ))
        .with_parameter(ParameterSpec::optional(
            "top_n",
            ParamType::Integer,
            "Return at most this many rows",
        ))
        .allow(Role::Business);
        Self { spec, data }
    }
}

#[async_trait::async_trait]
impl Tool for QueryBusinessDataTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<Value> {
        let input: QueryInput = parse_input(&self.spec.name, arguments)?;
        let fail = |reason: String| Error::handler(&self.spec.name, reason);

        let metric: Metric = input.metric.parse().map_err(fail)?;
        let group_by: Option<Dimension> = input
            .group_by
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(fail)?;
        let status: Option<OrderStatus> = input
            .status
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(fail)?;
        let top_n = match input.top_n {
            Some(n) if n < 1 => return Err(fail(format!("top_n must be at least 1, got {n}"))),
            Some(n) => Some(n as usize),
            None => None,
        };

        let mut rows = self.data.aggregate(metric, group_by, status);
        let total_groups = rows.len();
        if let Some(n) = top_n {
            rows.truncate(n);
        }

        Ok(json!({
            "metric": metric.as_str(),
            "group_by": group_by.map(|d| d.as_str()),
            "status": status.map(|s| s.as_str()),
            "total_groups": total_groups,
            "rows": rows,
        }))
    }
}

/// Flags unusual revenue amounts
pub struct CheckRevenueAnomaliesTool {
    spec: ToolSpec,
    data: Arc<DataStore>,
}

impl CheckRevenueAnomaliesTool {
    /// Create the tool
    #[must_use]
    pub fn new(data: Arc<DataStore>) -> Self {
        let spec = ToolSpec::new(
            "check_revenue_anomalies",
            "Scan all revenue records for unusual amounts and report the most recent anomaly.",
        )
        .allow(Role::Business);
        Self { spec, data }
    }
}

#[async_trait::async_trait]
impl Tool for CheckRevenueAnomaliesTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, _arguments: Map<String, Value>) -> Result<Value> {
        let report = self.data.revenue_anomalies();
        Ok(json!({
            "summary": report.summary(),
            "report": report,
        }))
    }
}

/// Lists open orders past their estimated delivery
pub struct CheckCriticalDelaysTool {
    spec: ToolSpec,
    data: Arc<DataStore>,
    config: BuiltinsConfig,
}

impl CheckCriticalDelaysTool {
    /// Create the tool
    #[must_use]
    pub fn new(data: Arc<DataStore>, config: BuiltinsConfig) -> Self {
        let spec = ToolSpec::new(
            "check_critical_delays",
            "Find open orders (not delivered or cancelled) whose estimated delivery date has passed.",
        )
        .allow(Role::Business);
        Self { spec, data, config }
    }
}

#[async_trait::async_trait]
impl Tool for CheckCriticalDelaysTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, _arguments: Map<String, Value>) -> Result<Value> {
        let report = self.data.delay_report(self.config.today());
        Ok(json!({
            "summary": report.summary(),
            "report": report,
        }))
    }
}
