//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "glucotel.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Glucotel configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point store.base_url at your resource store");
                println!("  3. Set GLUCOTEL_STORE_API_KEY if the store requires one");
                println!("  4. Validate configuration: glucotel validate-config");
                println!("  5. Compute overviews: glucotel report");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the starter configuration
    fn generate_config() -> String {
        r#"# Glucotel Configuration File
# Gestational diabetes tele-monitoring core

# Runtime environment (development, staging, production)
environment = "development"

[application]
log_level = "info"
dry_run = false

[store]
# Resource store backend: rest | memory
backend = "rest"
base_url = "http://localhost:3000"
# api_key = "${GLUCOTEL_STORE_API_KEY}"
request_timeout_seconds = 30
tls_verify = true

# Glycemia classification thresholds, in g/L.
# A patient's own targetRange overrides the normal bounds.
[thresholds]
hypo = 0.6
fasting_normal = 0.95
fasting_warning = 1.05
post_meal_normal = 1.2
post_meal_warning = 1.4

# Aggregation window and expected readings per week by monitoring mode
# (classique = 4/day, lean = 2/day, strict = 6/day)
[monitoring]
window_days = 7
expected_classique = 28
expected_lean = 14
expected_strict = 42

[mfa]
# Lifetime of a login code
code_ttl_seconds = 180
# Resend allowed only in the final stretch of the code's lifetime
resend_window_seconds = 60

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"
local_max_size_mb = 100
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_and_validates() {
        let content = InitArgs::generate_config();
        let config: crate::config::GlucotelConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("glucotel.toml");
        std::fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        let code = args.execute().await.unwrap();
        assert_eq!(code, 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_writes_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("glucotel.toml");

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        let code = args.execute().await.unwrap();
        assert_eq!(code, 0);
        assert!(path.exists());
    }
}
