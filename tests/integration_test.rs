//! Integration tests for ABI
//!
//! These tests verify the integration between the crates:
//! - abi-data: CSV loading and analytics
//! - abi-tools: Built-in tools over a loaded store
//! - abi-llm: Scripted provider behind the gateway
//! - abi-core: Agent loop, sessions and traces
//! - abi-replay: Trace export and timeline

use std::fs;
use std::path::Path;
use std::sync::Arc;

use abi_core::{Agent, LlmGateway, OrchestratorConfig, Session, TurnStatus, GENERIC_FAILURE_MESSAGE};
use abi_data::{AnomalyReport, DataStore, DeliverySummary, Dimension, Metric};
use abi_llm::MockProvider;
use abi_replay::TraceKind;
use abi_tools::{register_builtins, BuiltinsConfig, Caller, Role, ToolCallRequest, ToolRegistry, ToolRunner};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

fn write_tables(dir: &Path) {
    fs::write(
        dir.join("customers.csv"),
        "customer_id,name,email,region\n\
         CUST_001,Alice Smith,alice@example.com,North\n\
         CUST_002,Bob Jones,bob@example.com,South\n",
    )
    .unwrap();
    fs::write(
        dir.join("products.csv"),
        "product_id,name,category,price,stock_level\n\
         PROD_001,Laptop,Electronics,1000.00,12\n\
         PROD_002,Desk,Furniture,250.00,4\n",
    )
    .unwrap();
    fs::write(
        dir.join("orders.csv"),
        "order_id,customer_id,product_id,status,order_date,est_delivery\n\
         ORD_1001,CUST_001,PROD_001,Out for Delivery,2025-03-01,2025-03-12\n\
         ORD_1002,CUST_001,PROD_002,Delivered,2025-02-01,2025-02-05\n\
         ORD_1003,CUST_002,PROD_002,Processing,2025-03-10,2025-03-20\n",
    )
    .unwrap();
    fs::write(
        dir.join("revenue.csv"),
        "revenue_id,order_id,amount,date,payment_method\n\
         REV_1,ORD_1001,1000.00,2025-03-01,Credit Card\n\
         REV_2,ORD_1002,250.00,2025-02-01,PayPal\n\
         REV_3,ORD_1003,250.00,2025-03-10,PayPal\n",
    )
    .unwrap();
}

fn load_store() -> (TempDir, Arc<DataStore>) {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let store = DataStore::load(dir.path()).unwrap();
    (dir, Arc::new(store))
}

fn registry(data: Arc<DataStore>) -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    register_builtins(
        &mut registry,
        data,
        BuiltinsConfig::default().with_reference_date(today()),
    )
    .unwrap();
    Arc::new(registry)
}

fn agent(provider: &MockProvider) -> (TempDir, Agent) {
    let (dir, data) = load_store();
    let gateway = LlmGateway::new(Arc::new(provider.clone()));
    let agent = Agent::new(Arc::new(gateway), registry(data), OrchestratorConfig::default());
    (dir, agent)
}

// ============================================================================
// Data Layer Integration Tests
// ============================================================================

#[test]
fn test_store_analytics() {
    let (_dir, data) = load_store();

    let rows = data.aggregate(Metric::Revenue, Some(Dimension::Category), None);
    assert_eq!(rows[0].key, "Electronics");
    assert_eq!(rows[0].value, 1000.0);
    assert_eq!(rows[1].key, "Furniture");
    assert_eq!(rows[1].value, 500.0);

    let report = data.delay_report(today());
    assert_eq!(report.total, 1);
    assert_eq!(report.sample[0].order_id, "ORD_1001");
    assert_eq!(report.sample[0].days_overdue, 3);

    assert!(matches!(
        data.delivery_summary("CUST_001", today()),
        DeliverySummary::Delayed { .. }
    ));
    assert!(matches!(
        data.delivery_summary("CUST_002", today()),
        DeliverySummary::OnTrack { in_progress: 1 }
    ));

    // Three payments are below the minimum sample size
    assert!(matches!(data.revenue_anomalies(), AnomalyReport::Insufficient { .. }));
}

// ============================================================================
// Tool Integration Tests
// ============================================================================

#[test]
fn test_role_visibility() {
    let (_dir, data) = load_store();
    let registry = registry(data);

    for role in Role::ALL {
        for spec in registry.specs() {
            let visible = registry
                .visible_tools(role)
                .iter()
                .any(|s| s.name == spec.name);
            assert_eq!(visible, spec.allowed_roles.contains(&role), "{} / {role}", spec.name);
        }
    }
    assert_eq!(registry.len(), 7);
}

#[tokio::test]
async fn test_customer_scoping_through_runner() {
    let (_dir, data) = load_store();
    let runner = ToolRunner::with_defaults(registry(data));
    let caller = Caller::customer("CUST_001");

    let own = ToolCallRequest::new(
        "call_1_0",
        "get_customer_orders",
        json!({"customer_id": "cust_001"}).as_object().cloned().unwrap(),
    );
    let result = runner.invoke(&own, &caller).await.unwrap();
    assert!(result.success);
    assert_eq!(result.output["found"], true);

    let other = ToolCallRequest::new(
        "call_1_1",
        "get_customer_orders",
        json!({"customer_id": "CUST_002"}).as_object().cloned().unwrap(),
    );
    let err = runner.invoke(&other, &caller).await.unwrap_err();
    assert!(matches!(err, abi_tools::Error::ForbiddenTool { .. }));

    let business = ToolCallRequest::new(
        "call_1_2",
        "check_critical_delays",
        serde_json::Map::new(),
    );
    let err = runner.invoke(&business, &caller).await.unwrap_err();
    assert!(matches!(err, abi_tools::Error::ForbiddenTool { .. }));
}

// ============================================================================
// Agent Loop Integration Tests
// ============================================================================

#[tokio::test]
async fn test_customer_order_status_turn() {
    let provider = MockProvider::new();
    provider.push_tool_call("get_order_status", json!({"customer_id": "CUST_001"}));
    provider.push_answer("Your order is out for delivery.");
    let (_dir, agent) = agent(&provider);
    let mut session = Session::customer("alice", "CUST_001");

    let outcome = agent
        .submit(&mut session, "What is the status of my order?")
        .await
        .unwrap();

    assert_eq!(outcome.status, TurnStatus::Completed);
    assert_eq!(outcome.response, "Your order is out for delivery.");
    assert_eq!(
        outcome.trace.kinds(),
        vec![
            TraceKind::ModelDecision,
            TraceKind::ToolInvocation,
            TraceKind::ToolResult,
            TraceKind::FinalAnswer,
        ]
    );

    let result = &outcome.trace.entries()[2].payload;
    assert_eq!(result["success"], true);
    assert_eq!(result["output"]["order"]["order_id"], "ORD_1001");
    assert_eq!(result["output"]["order"]["is_delayed"], true);

    // The tool result reached the model on the second call
    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    let last = requests[1].messages.last().unwrap();
    assert!(last.content.contains("ORD_1001"));
}

#[tokio::test]
async fn test_business_fallback_after_forbidden_tool() {
    let provider = MockProvider::new();
    provider.push_tool_call("get_order_status", json!({"customer_id": "CUST_001"}));
    provider.push_tool_call(
        "query_business_data",
        json!({"metric": "revenue", "group_by": "category"}),
    );
    provider.push_answer("Electronics leads with $1,000.");
    let (_dir, agent) = agent(&provider);
    let mut session = Session::business("ops");

    let outcome = agent
        .submit(&mut session, "Which category earns the most?")
        .await
        .unwrap();

    assert_eq!(outcome.status, TurnStatus::Completed);
    assert_eq!(outcome.iterations, 3);

    let results: Vec<&Value> = outcome
        .trace
        .entries()
        .iter()
        .filter(|e| e.kind == TraceKind::ToolResult)
        .map(|e| &e.payload)
        .collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["success"], false);
    assert!(results[0]["error"].as_str().unwrap().contains("forbidden"));
    assert_eq!(results[1]["success"], true);
    assert_eq!(results[1]["call_id"], "call_2_0");
    assert_eq!(results[1]["output"]["rows"][0]["key"], "Electronics");

    // Business sessions never see customer tools
    let requests = provider.requests();
    let advertised: Vec<&str> = requests[0]
        .tools
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert!(!advertised.contains(&"get_order_status"));
    assert!(advertised.contains(&"query_business_data"));
}

#[tokio::test]
async fn test_gateway_failure_is_generic() {
    let provider = MockProvider::new();
    provider.push_error(abi_llm::Error::RateLimit);
    provider.push_error(abi_llm::Error::RateLimit);
    let (_dir, agent) = agent(&provider);
    let mut session = Session::business("ops");

    let outcome = agent.submit(&mut session, "Any anomalies?").await.unwrap();

    assert_eq!(outcome.status, TurnStatus::Failed);
    assert_eq!(outcome.response, GENERIC_FAILURE_MESSAGE);
    assert_eq!(provider.call_count(), 2);
    assert_eq!(outcome.trace.count(TraceKind::GatewayError), 2);
}

#[tokio::test]
async fn test_trace_export_and_timeline() {
    let provider = MockProvider::new();
    provider.push_tool_call("check_critical_delays", json!({}));
    provider.push_answer("One order is late: ORD_1001.");
    let (_dir, agent) = agent(&provider);
    let mut session = Session::business("ops");

    agent.submit(&mut session, "Anything late?").await.unwrap();

    let trace = session.trace();
    let exported: Value = serde_json::from_str(&trace.to_json().unwrap()).unwrap();
    let kinds: Vec<&str> = exported
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["model_decision", "tool_invocation", "tool_result", "final_answer"]
    );

    let timeline = trace.timeline();
    assert_eq!(timeline.len(), 4);
    assert!(timeline[0].summary.contains("check_critical_delays"));
    assert!(timeline[3].summary.contains("ORD_1001"));
}
