//! Network Device Prometheus Exporter
//!
//! A Prometheus exporter that polls network devices on demand, one device per
//! scrape request.
//!
//! # Overview
//!
//! Each scrape names a node, a module and a set of subsystems. The exporter
//! authenticates against the device with the node's stored credentials (failing
//! over between them), queries the selected data categories concurrently and
//! answers with the node's metric snapshot. Snapshots are cached for the poll
//! interval, so frequent scrapes do not hammer the device.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   GET /metrics?node=..   ┌──────────────────────────────┐
//! │ Prometheus │ ───────────────────────► │  Dispatcher                  │
//! └────────────┘ ◄─────────────────────── │   token / node / module      │
//!                    text exposition      │        │                     │
//!                                         │        ▼                     │
//!                                         │  Node (TTL gate)             │
//!                                         │   credential failover        │
//!                                         │   fan-out ─┬─ interfaces     │       JSON-RPC
//!                                         │            ├─ vlans          │ ◄──────────────► device
//!                                         │            ├─ environment    │     WebSocket
//!                                         │            ├─ resources      │
//!                                         │            ├─ transceivers   │
//!                                         │            └─ routing        │
//!                                         └──────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`dispatcher`] - Node registry, request validation and rendering
//! - [`node`] - Per-node state and the gather cycle
//! - [`credentials`] - Credential store with failover
//! - [`collectors`] - Per-category collectors and the concurrent fan-out
//! - [`device`] - Device client trait and the JSON-RPC implementation
//! - [`metrics`] - Metric catalog and Prometheus rendering
//! - [`inventory`] - Inventory and vault loading
//! - [`server`] - HTTP server and inventory reload loop
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use network_exporter::{config::Config, device::JsonRpcConnector, dispatcher::Dispatcher, server};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     let connector = Arc::new(JsonRpcConnector::new(Duration::from_secs(5), false));
//!     let dispatcher = Arc::new(Dispatcher::new(connector, config.modules.clone(), 15));
//!     server::load_inventory(&config, &dispatcher).await?;
//!     server::start(config, dispatcher).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod credentials;
pub mod device;
pub mod dispatcher;
pub mod error;
pub mod inventory;
pub mod metrics;
pub mod node;
pub mod server;
