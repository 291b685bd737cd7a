//! Report command implementation
//!
//! This module implements the `report` command: compute monitoring
//! overviews (compliance + risk) for one patient or for every patient,
//! ordered by risk tier.

use crate::adapters::store::create_store;
use crate::config::load_config;
use crate::core::auth::SystemClock;
use crate::core::overview::{MonitoringCoordinator, PatientOverview};
use crate::domain::PatientId;
use clap::Args;
use std::sync::Arc;

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Restrict the report to one patient
    #[arg(long)]
    pub patient_id: Option<String>,

    /// Emit the overviews as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    /// Execute the report command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Computing monitoring report");

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(2); // Configuration error exit code
            }
        };

        // Create store client
        let store = match create_store(&config.store) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to store");
                println!("   Error: {}", e);
                return Ok(4); // Connection error exit code
            }
        };

        let coordinator = MonitoringCoordinator::new(store, Arc::new(SystemClock), &config);

        let overviews = match &self.patient_id {
            Some(raw_id) => {
                let patient_id = match PatientId::new(raw_id.clone()) {
                    Ok(id) => id,
                    Err(e) => {
                        println!("❌ Invalid patient id: {e}");
                        return Ok(2);
                    }
                };
                match coordinator.patient_overview(&patient_id).await {
                    Ok(overview) => vec![overview],
                    Err(e) => {
                        println!("❌ Failed to compute overview for {raw_id}");
                        println!("   Error: {}", e);
                        return Ok(5); // Fatal error exit code
                    }
                }
            }
            None => match coordinator.overview_all().await {
                Ok(overviews) => overviews,
                Err(e) => {
                    println!("❌ Failed to compute overviews");
                    println!("   Error: {}", e);
                    return Ok(5);
                }
            },
        };

        if overviews.is_empty() {
            println!("No patients found.");
            return Ok(0);
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&overviews)?);
        } else {
            Self::print_table(&overviews);
        }

        Ok(0)
    }

    fn print_table(overviews: &[PatientOverview]) {
        println!("📊 Monitoring Report");
        println!();
        println!(
            "{:<30} {:<10} {:<12} {:<10} {:<10} {:<10} {:<15}",
            "Patient", "Mode", "Compliance", "Average", "Trend %", "Alerts", "Status"
        );
        println!("{}", "-".repeat(100));

        for overview in overviews {
            println!(
                "{:<30} {:<10} {:<12} {:<10} {:<10} {:<10} {:<15}",
                overview.patient_id.as_str(),
                overview.monitoring_mode.to_string(),
                format!("{}%", overview.compliance.compliance_rate),
                overview.compliance.weekly_average.to_string(),
                overview.compliance.trend_pct.to_string(),
                overview.alert_count,
                overview.risk.label,
            );
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_args_defaults() {
        let args = ReportArgs {
            patient_id: None,
            json: false,
        };
        assert!(args.patient_id.is_none());
        assert!(!args.json);
    }

    #[tokio::test]
    async fn test_report_with_missing_config_returns_config_error() {
        let args = ReportArgs {
            patient_id: None,
            json: false,
        };
        let code = args.execute("definitely-missing.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
