use logi_catalog::inventory::DEFAULT_LOW_STOCK_THRESHOLD;
use logi_order::planner::DEFAULT_SURCHARGE_RATE;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres URL. Without one the service runs on the in-memory store.
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Charged per unit of volume an urgent shipment falls short of capacity.
    #[serde(default = "default_surcharge_rate")]
    pub urgent_surcharge_rate: f64,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_port() -> u16 { 8000 }
fn default_max_connections() -> u32 { 5 }
fn default_true() -> bool { true }
fn default_surcharge_rate() -> f64 { DEFAULT_SURCHARGE_RATE }
fn default_low_stock_threshold() -> i32 { DEFAULT_LOW_STOCK_THRESHOLD }
fn default_channel_capacity() -> usize { 100 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            run_migrations: default_true(),
        }
    }
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            urgent_surcharge_rate: default_surcharge_rate(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { channel_capacity: default_channel_capacity() }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `LOGI_DATABASE__URL=postgres://...` sets `database.url`
            .add_source(
                config::Environment::with_prefix("LOGI")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }
}
