use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "default_modules")]
    pub modules: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_telemetry_path")]
    pub telemetry_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    /// Timeout applied to every request sent to a device.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Minimum interval between two gather cycles of the same node.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default)]
    pub verify_tls: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InventoryConfig {
    pub inventory_file: String,
    pub vault_file: String,
    /// Zero disables periodic reloads.
    #[serde(default)]
    pub reload_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_tokens")]
    pub tokens: Vec<SecretString>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
            telemetry_path: default_telemetry_path(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            poll_interval_seconds: default_poll_interval(),
            verify_tls: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            tokens: default_tokens(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9533
}

fn default_telemetry_path() -> String {
    "/metrics".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_poll_interval() -> u64 {
    15
}

fn default_tokens() -> Vec<SecretString> {
    vec![SecretString::from("anonymous")]
}

fn default_modules() -> Vec<String> {
    vec!["cisco_nxos".to_string()]
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("NETWORK_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
