//! Device API Type Definitions
//!
//! Structured data returned by a network device for each data category.
//! These types are deserialized from the JSON-RPC responses of the device API
//! and consumed by the category collectors.
//!
//! # Design Notes
//!
//! - **Serde Defaults**: `#[serde(default)]` is used throughout so that platforms which
//!   omit a field still produce a value (and therefore a metric) for every entity.
//! - **Strings for states**: link, duplex and speed states are kept as reported; the
//!   collectors own the numeric encoding.
//!
//! # API Methods Covered
//!
//! - `system.info` → [`SystemInfo`]
//! - `interface.query` → [`Interface`]
//! - `vlan.query` → [`Vlan`]
//! - `system.environment` → [`Environment`]
//! - `system.resources` → [`SystemResources`]
//! - `transceiver.query` → [`Transceiver`]
//! - `bgp.peer.query` → [`BgpPeer`]
//!
//! # JSON-RPC Protocol
//!
//! - [`JsonRpcRequest`] - Outgoing method calls
//! - [`JsonRpcResponse`] - Incoming responses

use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Identity of an authenticated device
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub chassis_id: String,
    #[serde(default)]
    pub processor_board_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub local_index: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metrics: InterfaceLoad,
    #[serde(default)]
    pub counters: InterfaceCounters,
    #[serde(default)]
    pub props: InterfaceProps,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceLoad {
    #[serde(default)]
    pub bandwidth: u64,
    #[serde(default)]
    pub delay: u64,
    #[serde(default)]
    pub reliability: u64,
    #[serde(default)]
    pub rxload: u64,
    #[serde(default)]
    pub txload: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterfaceCounters {
    pub input_bytes: u64,
    pub input_packets: u64,
    pub input_unicast_packets: u64,
    pub input_broadcast_packets: u64,
    pub input_multicast_packets: u64,
    pub input_jumbo_packets: u64,
    pub input_discards: u64,
    pub input_errors: u64,
    pub input_frame_errors: u64,
    pub input_overruns: u64,
    pub input_pause: u64,
    pub output_bytes: u64,
    pub output_packets: u64,
    pub output_unicast_packets: u64,
    pub output_broadcast_packets: u64,
    pub output_multicast_packets: u64,
    pub output_jumbo_packets: u64,
    pub output_discards: u64,
    pub output_errors: u64,
    pub output_underruns: u64,
    pub output_pause: u64,
    pub collisions: u64,
    pub late_collisions: u64,
    pub crc_errors: u64,
    pub runts: u64,
    pub no_carrier: u64,
    pub lost_carrier: u64,
    pub resets: u64,
    pub babbles: u64,
    pub bad_ethtype_drops: u64,
    pub bad_proto_drops: u64,
    pub deferred: u64,
    pub dribble: u64,
    pub ignored: u64,
    pub input_compressed: u64,
    pub input_fifo: u64,
    pub input_iface_down_drops: u64,
    pub input_ucast_bytes: u64,
    pub no_buffer: u64,
    pub output_carrier_errors: u64,
    pub output_fifo: u64,
    pub output_ucast_bytes: u64,
    pub storm_suppression: u64,
    pub watchdog: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterfaceProps {
    pub beacon_enabled: bool,
    pub auto_negotiation_enabled: bool,
    pub mdix_enabled: bool,
    pub mtu: u64,
    pub speed: String,
    pub duplex: String,
    pub encapsulated_vlan: u64,
    pub state: String,
    pub admin_state: String,
    pub parent_interface: String,
    pub ip_address: String,
    pub ip_mask: u8,
    pub mode: String,
    pub hw_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vlan {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub shutdown_state: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub fans: Vec<Fan>,
    #[serde(default)]
    pub power_supplies: Vec<PowerSupply>,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fan {
    pub name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PowerSupply {
    pub id: u32,
    pub model: String,
    pub status: String,
    pub power_input: f64,
    pub power_output: f64,
    pub power_capacity: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Sensor {
    pub name: String,
    pub module: u32,
    pub status: String,
    pub temperature: f64,
    pub threshold_high: f64,
    pub threshold_low: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SystemResources {
    pub processes: ProcessUsage,
    pub memory: MemoryUsage,
    pub cpu: CpuUsage,
    pub cpus: Vec<CpuCore>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProcessUsage {
    pub running: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemoryUsage {
    pub total: u64,
    pub free: u64,
    pub used: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CpuUsage {
    pub idle: f64,
    pub kernel: f64,
    pub user: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CpuCore {
    pub id: u32,
    pub usage: CpuUsage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transceiver {
    pub interface: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub lanes: Vec<TransceiverLane>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransceiverLane {
    pub id: u32,
    pub temperature: f64,
    pub voltage: f64,
    pub current: f64,
    pub tx_power: f64,
    pub rx_power: f64,
    pub errors: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BgpPeer {
    pub neighbor: String,
    pub remote_as: u32,
    pub vrf: String,
    pub state: String,
    pub prefixes_received: u64,
    pub uptime_seconds: u64,
}
