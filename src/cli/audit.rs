//! Audit command - business status board

use crate::app::{load_data, AppConfig};
use abi_tools::BuiltinsConfig;
use anyhow::Result;

/// Print the revenue anomaly and critical delay checks
pub fn run(config: &AppConfig) -> Result<()> {
    let data = load_data(config)?;
    let today = BuiltinsConfig {
        reference_date: config.data.reference_date,
    }
    .today();

    let anomalies = data.revenue_anomalies();
    let delays = data.delay_report(today);

    println!("ABI status board ({today})");
    println!("========================");
    println!("Revenue:    {}", anomalies.summary());
    println!("Deliveries: {}", delays.summary());
    Ok(())
}
