//! Engine configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Telemetry configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Finance defaults applied when building finance contexts.
    #[serde(default)]
    pub finance: FinanceDefaults,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Default tracing filter when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "tessera=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// Finance defaults for organizations without explicit overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct FinanceDefaults {
    /// Balance tolerance in minor currency units (debits vs credits).
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
    /// Default tax rate (percent) for tax lines that carry no amount.
    #[serde(default = "default_tax_rate")]
    pub default_tax_rate: Decimal,
}

fn default_balance_tolerance() -> Decimal {
    // One minor currency unit.
    Decimal::new(1, 2)
}

fn default_tax_rate() -> Decimal {
    Decimal::new(300, 2) // 3.00 percent
}

impl Default for FinanceDefaults {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
            default_tax_rate: default_tax_rate(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            finance: FinanceDefaults::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TESSERA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
