//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Glucotel configuration file and probing the resource store.

use crate::adapters::store::create_store;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also probe the resource store for reachability
    #[arg(long)]
    pub check_store: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing, so success here means the
        // configuration is both well-formed and consistent
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Store Backend: {:?}", config.store.backend);
        println!("  Store URL: {}", config.store.base_url);
        println!(
            "  Thresholds: hypo < {} | fasting ≤ {} / {} | post-meal ≤ {} / {}",
            config.thresholds.hypo,
            config.thresholds.fasting_normal,
            config.thresholds.fasting_warning,
            config.thresholds.post_meal_normal,
            config.thresholds.post_meal_warning,
        );
        println!(
            "  Window: {} days | expected/week: classique={} lean={} strict={}",
            config.monitoring.window_days,
            config.monitoring.expected_classique,
            config.monitoring.expected_lean,
            config.monitoring.expected_strict,
        );
        println!(
            "  MFA: ttl={}s resend window={}s",
            config.mfa.code_ttl_seconds, config.mfa.resend_window_seconds,
        );
        println!();

        if self.check_store {
            let store = match create_store(&config.store) {
                Ok(s) => s,
                Err(e) => {
                    println!("❌ Failed to create store client");
                    println!("   Error: {e}");
                    return Ok(4); // Connection error exit code
                }
            };

            match store.health_check().await {
                Ok(_) => println!("✅ Store is reachable"),
                Err(e) => {
                    println!("❌ Store health check failed");
                    println!("   Error: {e}");
                    return Ok(4);
                }
            }
            println!();
        }

        Ok(0)
    }
}
