//! Device API Client
//!
//! The seam between the scrape engine and a network device. The engine only
//! sees the [`DeviceConnector`] / [`DeviceClient`] traits; [`JsonRpcConnector`]
//! is the production implementation speaking JSON-RPC over WebSocket.
//!
//! # Architecture
//!
//! - **Connect**: one client per gather cycle, built from the node's [`Target`]
//! - **Authenticate**: `auth.login` with one username/password pair, followed by
//!   `system.info`, which doubles as the proof that the credential works
//! - **Fetch**: one method per data category, issued on the authenticated session
//!
//! # Example
//!
//! ```no_run
//! use network_exporter::device::{DeviceConnector, JsonRpcConnector, Protocol, Target};
//! use secrecy::SecretString;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let connector = JsonRpcConnector::new(Duration::from_secs(5), false);
//! let target = Target::new("10.1.1.1", Some(443), Protocol::Https);
//! let client = connector.connect(&target);
//! let info = client
//!     .authenticate("admin", &SecretString::from("secret"))
//!     .await?;
//! println!("{}", info.hostname);
//! # Ok(())
//! # }
//! ```

use crate::device::connection::ConnectionManager;
use crate::device::types::*;
use crate::error::Result;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Transport requested by the inventory (`api_proto`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "http" => Some(Protocol::Http),
            "https" => Some(Protocol::Https),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Https => write!(f, "https"),
        }
    }
}

/// Connection parameters of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: Option<u16>,
    pub protocol: Protocol,
}

impl Target {
    pub fn new(host: impl Into<String>, port: Option<u16>, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
        }
    }

    /// `host[:port]` as used in URLs and log lines
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }
}

/// One authenticated conversation with a device.
///
/// Implementations must bound every call with their configured timeout.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Log in with a single credential and return the device identity.
    async fn authenticate(&self, username: &str, password: &SecretString) -> Result<SystemInfo>;

    async fn interfaces(&self) -> Result<Vec<Interface>>;

    async fn vlans(&self) -> Result<Vec<Vlan>>;

    async fn environment(&self) -> Result<Environment>;

    async fn resources(&self) -> Result<SystemResources>;

    async fn transceivers(&self) -> Result<Vec<Transceiver>>;

    async fn bgp_peers(&self) -> Result<Vec<BgpPeer>>;
}

/// Factory producing a fresh [`DeviceClient`] for a target
pub trait DeviceConnector: Send + Sync {
    fn connect(&self, target: &Target) -> Arc<dyn DeviceClient>;
}

/// Builds [`JsonRpcClient`]s sharing one timeout and TLS policy
#[derive(Debug, Clone)]
pub struct JsonRpcConnector {
    timeout: Duration,
    verify_tls: bool,
}

impl JsonRpcConnector {
    pub fn new(timeout: Duration, verify_tls: bool) -> Self {
        Self {
            timeout,
            verify_tls,
        }
    }
}

impl DeviceConnector for JsonRpcConnector {
    fn connect(&self, target: &Target) -> Arc<dyn DeviceClient> {
        Arc::new(JsonRpcClient::new(target, self.timeout, self.verify_tls))
    }
}

/// JSON-RPC over WebSocket device client
///
/// Requests from concurrent category collectors are serialized on the single
/// session held by the `ConnectionManager`.
pub struct JsonRpcClient {
    connection_manager: ConnectionManager,
}

impl JsonRpcClient {
    pub fn new(target: &Target, timeout: Duration, verify_tls: bool) -> Self {
        Self {
            connection_manager: ConnectionManager::new(target, timeout, verify_tls),
        }
    }

    async fn execute_query<T>(&self, method: &str, params: Option<serde_json::Value>) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.connection_manager.execute_query(method, params).await
    }
}

#[async_trait]
impl DeviceClient for JsonRpcClient {
    async fn authenticate(&self, username: &str, password: &SecretString) -> Result<SystemInfo> {
        self.connection_manager
            .login(username, password.expose_secret())
            .await?;
        self.execute_query("system.info", None).await
    }

    async fn interfaces(&self) -> Result<Vec<Interface>> {
        self.execute_query("interface.query", Some(serde_json::json!([])))
            .await
    }

    async fn vlans(&self) -> Result<Vec<Vlan>> {
        self.execute_query("vlan.query", Some(serde_json::json!([])))
            .await
    }

    async fn environment(&self) -> Result<Environment> {
        self.execute_query("system.environment", None).await
    }

    async fn resources(&self) -> Result<SystemResources> {
        self.execute_query("system.resources", None).await
    }

    async fn transceivers(&self) -> Result<Vec<Transceiver>> {
        self.execute_query("transceiver.query", Some(serde_json::json!([])))
            .await
    }

    async fn bgp_peers(&self) -> Result<Vec<BgpPeer>> {
        self.execute_query("bgp.peer.query", Some(serde_json::json!([])))
            .await
    }
}
