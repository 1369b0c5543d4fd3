//! Prometheus Metrics Definitions
//!
//! This module defines every metric the exporter can emit and the glue that turns a
//! node's snapshot into Prometheus text exposition.
//!
//! # Metric Categories
//!
//! ## Node Health
//! - Up/down, inventory name, failed request counter, next poll time, scrape time
//! - Device hostname and board identifier
//!
//! ## Interfaces and VLANs
//! - Interface identity, load, traffic and error counters, properties
//! - VLAN identity and state
//!
//! ## Platform
//! - Fans, power supplies and temperature sensors
//! - Process, memory and CPU usage
//! - Transceiver lanes
//!
//! ## Routing
//! - BGP peer state and received prefixes
//!
//! All metrics use the `net_` namespace prefix and carry the node uuid as the
//! first label.
//!
//! # Snapshot model
//!
//! Collectors never touch a registry. They produce [`Metric`] tuples which are
//! stored in the node snapshot; at request time the snapshot is wrapped in a
//! [`SnapshotCollector`] and registered into a short-lived [`Registry`].

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;

pub const NAMESPACE: &str = "net";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// Static description of one metric name
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDescriptor {
    /// Fully qualified name, including the namespace
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub labels: &'static [&'static str],
}

/// One sample: a descriptor, a value and the label values in descriptor order
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub desc: &'static MetricDescriptor,
    pub value: f64,
    pub label_values: Vec<String>,
}

impl Metric {
    pub fn new(desc: &'static MetricDescriptor, value: f64, label_values: Vec<String>) -> Self {
        debug_assert_eq!(desc.labels.len(), label_values.len(), "{}", desc.name);
        Self {
            desc,
            value,
            label_values,
        }
    }

    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    pub fn kind(&self) -> MetricKind {
        self.desc.kind
    }

    /// Value of a label by name
    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }
}

macro_rules! descriptor {
    ($ident:ident, $name:literal, $help:literal, $kind:ident, [$($label:literal),*]) => {
        pub static $ident: MetricDescriptor = MetricDescriptor {
            name: concat!("net_", $name),
            help: $help,
            kind: MetricKind::$kind,
            labels: &[$($label),*],
        };
    };
}

// Node health
descriptor!(NODE_UP, "node_up", "Is node up and responding to queries (1) or is it down (0).", Gauge, ["node"]);
descriptor!(NODE_NAME, "node_name", "The inventory name for the device. The value is always set to 1.", Gauge, ["node", "name"]);
descriptor!(NODE_ERRORS, "node_failed_req_count", "The number of failed requests for a network node.", Counter, ["node"]);
descriptor!(NODE_NEXT_POLL, "node_next_poll", "The timestamp of the next potential scrape of the node.", Gauge, ["node"]);
descriptor!(NODE_SCRAPE_TIME, "node_scrape_time", "The amount of time it took to scrape the node.", Gauge, ["node"]);
descriptor!(NODE_HOSTNAME, "node_hostname", "The hostname reported by the device. The value is always set to 1.", Gauge, ["node", "hostname"]);
descriptor!(NODE_ID, "node_id", "The processor board identifier of the device. The value is always set to 1.", Gauge, ["node", "id"]);

// Interfaces
descriptor!(IFACE_NAME, "iface_name", "The name of an interface. The value is always set to 1.", Gauge, ["node", "iface", "iface_name"]);
descriptor!(IFACE_LOCAL_INDEX, "iface_local_index", "The local index of an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_DESCR, "iface_descr", "The description of an interface. The value is always set to 1.", Gauge, ["node", "iface", "descr"]);
descriptor!(IFACE_BANDWIDTH, "iface_bandwidth", "The bandwidth metric of an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_DELAY, "iface_delay", "The delay metric of an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_RELIABILITY, "iface_reliability", "The reliability metric of an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_RX_LOAD, "iface_rx_load", "The receive load of an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_TX_LOAD, "iface_tx_load", "The transmit load of an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_INPUT_BYTES, "iface_input_bytes", "The number of bytes received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_PACKETS, "iface_input_packets", "The number of packets received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_UCAST_PACKETS, "iface_input_ucast_packets", "The number of unicast packets received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_BCAST_PACKETS, "iface_input_bcast_packets", "The number of broadcast packets received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_MCAST_PACKETS, "iface_input_mcast_packets", "The number of multicast packets received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_JUMBO_PACKETS, "iface_input_jumbo_packets", "The number of jumbo packets received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_DISCARDS, "iface_input_discards", "The number of inbound packets discarded by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_ERRORS, "iface_input_errors", "The number of inbound errors of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_FRAME_ERRORS, "iface_input_frame_errors", "The number of inbound frame errors of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_OVERRUNS, "iface_input_overruns", "The number of inbound overruns of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_PAUSE, "iface_input_pause", "The number of pause frames received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_BYTES, "iface_output_bytes", "The number of bytes sent by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_PACKETS, "iface_output_packets", "The number of packets sent by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_UCAST_PACKETS, "iface_output_ucast_packets", "The number of unicast packets sent by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_BCAST_PACKETS, "iface_output_bcast_packets", "The number of broadcast packets sent by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_MCAST_PACKETS, "iface_output_mcast_packets", "The number of multicast packets sent by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_JUMBO_PACKETS, "iface_output_jumbo_packets", "The number of jumbo packets sent by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_DISCARDS, "iface_output_discards", "The number of outbound packets discarded by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_ERRORS, "iface_output_errors", "The number of outbound errors of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_UNDERRUNS, "iface_output_underruns", "The number of outbound underruns of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_PAUSE, "iface_output_pause", "The number of pause frames sent by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_COLLISIONS, "iface_collisions", "The number of collisions on an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_LATE_COLLISIONS, "iface_late_collisions", "The number of late collisions on an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_CRC_ERRORS, "iface_crc_errors", "The number of CRC errors on an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_RUNTS, "iface_runts", "The number of runt frames received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_NO_CARRIER, "iface_no_carrier", "The number of no carrier events of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_LOST_CARRIER, "iface_lost_carrier", "The number of lost carrier events of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_RESETS, "iface_resets", "The number of resets of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_BABBLES, "iface_babbles", "The babbles counter of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_BAD_ETHTYPE_DROPS, "iface_bad_ethtype_drops", "The number of frames with an unknown ethertype dropped by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_BAD_PROTO_DROPS, "iface_bad_proto_drops", "The number of frames with an unknown protocol dropped by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_DEFERRED, "iface_deferred", "The number of deferred transmissions of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_DRIBBLE, "iface_dribble", "The number of dribble condition frames received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_IGNORED, "iface_ignored", "The number of inbound packets ignored by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_COMPRESSED, "iface_input_compressed", "The number of compressed packets received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_FIFO, "iface_input_fifo", "The number of inbound FIFO errors of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_IFACE_DOWN_DROPS, "iface_input_iface_down_drops", "The number of inbound packets dropped while an interface was down.", Counter, ["node", "iface"]);
descriptor!(IFACE_INPUT_UCAST_BYTES, "iface_input_ucast_bytes", "The number of unicast bytes received by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_NO_BUFFER, "iface_no_buffer", "The number of inbound packets dropped for lack of buffer space.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_CARRIER_ERRORS, "iface_output_carrier_errors", "The number of outbound carrier errors of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_FIFO, "iface_output_fifo", "The number of outbound FIFO errors of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_OUTPUT_UCAST_BYTES, "iface_output_ucast_bytes", "The number of unicast bytes sent by an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_STORM_SUPPRESSION, "iface_storm_suppression", "The number of packets dropped by storm suppression on an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_WATCHDOG, "iface_watchdog", "The number of watchdog events of an interface.", Counter, ["node", "iface"]);
descriptor!(IFACE_BEACON_ENABLED, "iface_beacon_enabled", "Whether beacon is enabled (1) or disabled (0) on an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_AUTO_NEGOTIATION_ENABLED, "iface_auto_negotiation_enabled", "Whether auto-negotiation is enabled (1) or disabled (0) on an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_MDIX_ENABLED, "iface_mdix_enabled", "Whether MDIX is enabled (1) or disabled (0) on an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_MTU, "iface_mtu", "The MTU of an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_SPEED, "iface_speed", "The speed of an interface in Mb/s, 0 when auto-negotiated.", Gauge, ["node", "iface"]);
descriptor!(IFACE_DUPLEX, "iface_duplex", "The duplex mode of an interface: auto (3), full (2), half (1), other (0).", Gauge, ["node", "iface"]);
descriptor!(IFACE_ENCAPSULATED_VLAN, "iface_encapsulated_vlan", "The encapsulated VLAN of an interface.", Gauge, ["node", "iface"]);
descriptor!(IFACE_STATE, "iface_state", "The operational state of an interface: up (1), down (0).", Gauge, ["node", "iface"]);
descriptor!(IFACE_ADMIN_STATE, "iface_admin_state", "The administrative state of an interface: up (1), down (0).", Gauge, ["node", "iface"]);
descriptor!(IFACE_SUBINTERFACE, "iface_subinterface", "Whether an interface is a subinterface (1) or not (0).", Gauge, ["node", "iface"]);
descriptor!(IFACE_ROUTED_MODE, "iface_routed_mode", "Whether an interface is in routed mode (1) or not (0).", Gauge, ["node", "iface"]);
descriptor!(IFACE_ACCESS_MODE, "iface_access_mode", "Whether an interface is in access mode (1) or not (0).", Gauge, ["node", "iface"]);
descriptor!(IFACE_IP_ADDRESS, "iface_ip_address", "The IP address of an interface. The value is always set to 1.", Gauge, ["node", "iface", "ip_address"]);
descriptor!(IFACE_HW_ADDRESS, "iface_hw_address", "The hardware address of an interface. The value is always set to 1.", Gauge, ["node", "iface", "hw_address"]);

// VLANs
descriptor!(VLAN_ID, "vlan_id", "The numeric identifier of a VLAN.", Gauge, ["node", "vlan"]);
descriptor!(VLAN_NAME, "vlan_name", "The name of a VLAN. The value is always set to 1.", Gauge, ["node", "vlan", "vlan_name"]);
descriptor!(VLAN_STATE, "vlan_state", "The state of a VLAN: active (1), any other value (0).", Gauge, ["node", "vlan"]);
descriptor!(VLAN_SHUTDOWN_STATE, "vlan_shutdown_state", "The shutdown state of a VLAN: noshutdown (1), any other value (0).", Gauge, ["node", "vlan"]);

// Environment
descriptor!(FAN_UP, "node_fan_up", "The status of a fan. 1 (up, Ok), 0 (down)", Gauge, ["node", "fan"]);
descriptor!(PS_UP, "node_ps_up", "The status of a power supply. 1 (up, Ok), 0 (down)", Gauge, ["node", "power_supply"]);
descriptor!(PS_POWER_INPUT, "node_ps_pwr_input", "The power input of a power supply.", Gauge, ["node", "power_supply"]);
descriptor!(PS_POWER_OUTPUT, "node_ps_pwr_output", "The power output of a power supply.", Gauge, ["node", "power_supply"]);
descriptor!(PS_POWER_CAPACITY, "node_ps_pwr_capacity", "The power capacity of a power supply.", Gauge, ["node", "power_supply"]);
descriptor!(SENSOR_UP, "node_sensor_up", "The status of a sensor. 1 (up, Ok), 0 (down)", Gauge, ["node", "sensor"]);
descriptor!(SENSOR_TEMPERATURE, "node_sensor_temperature", "The temperature of a sensor.", Gauge, ["node", "sensor"]);
descriptor!(SENSOR_THRESHOLD_HIGH, "node_sensor_temperature_threshold_high", "The alarm upper threshold for the temperature of a sensor.", Gauge, ["node", "sensor"]);
descriptor!(SENSOR_THRESHOLD_LOW, "node_sensor_temperature_threshold_low", "The alarm lower threshold for the temperature of a sensor.", Gauge, ["node", "sensor"]);

// System resources
descriptor!(PROCESSES_RUNNING, "node_running_process_count", "The number of running processes.", Gauge, ["node"]);
descriptor!(PROCESSES_TOTAL, "node_total_process_count", "The total number of processes.", Gauge, ["node"]);
descriptor!(MEMORY_TOTAL, "node_memory_total", "The total amount of memory.", Gauge, ["node"]);
descriptor!(MEMORY_FREE, "node_memory_free", "The amount of free memory.", Gauge, ["node"]);
descriptor!(MEMORY_USED, "node_memory_used", "The amount of used memory.", Gauge, ["node"]);
descriptor!(CPU_TOTAL_IDLE, "node_total_cpu_idle", "The idle percentage across all CPUs.", Gauge, ["node"]);
descriptor!(CPU_TOTAL_KERNEL, "node_total_cpu_kernel", "The kernel percentage across all CPUs.", Gauge, ["node"]);
descriptor!(CPU_TOTAL_USER, "node_total_cpu_user", "The user percentage across all CPUs.", Gauge, ["node"]);
descriptor!(CPU_IDLE, "node_cpu_idle", "The idle percentage of a CPU.", Gauge, ["node", "cpu"]);
descriptor!(CPU_KERNEL, "node_cpu_kernel", "The kernel percentage of a CPU.", Gauge, ["node", "cpu"]);
descriptor!(CPU_USER, "node_cpu_user", "The user percentage of a CPU.", Gauge, ["node", "cpu"]);

// Transceivers
descriptor!(TRANSCEIVER, "interface_transceiver", "The serial number and vendor of a transceiver attached to an interface. The value is always set to 1.", Gauge, ["node", "iface_name", "serial", "vendor"]);
descriptor!(TRANSCEIVER_LANE_TEMPERATURE, "interface_transceiver_lane_temperature", "The temperature of a transceiver lane.", Gauge, ["node", "iface_name", "lane_id"]);
descriptor!(TRANSCEIVER_LANE_VOLTAGE, "interface_transceiver_lane_voltage", "The voltage of a transceiver lane.", Gauge, ["node", "iface_name", "lane_id"]);
descriptor!(TRANSCEIVER_LANE_CURRENT, "interface_transceiver_lane_current", "The current of a transceiver lane.", Gauge, ["node", "iface_name", "lane_id"]);
descriptor!(TRANSCEIVER_LANE_TX_POWER, "interface_transceiver_lane_tx_power", "The transmit power of a transceiver lane.", Gauge, ["node", "iface_name", "lane_id"]);
descriptor!(TRANSCEIVER_LANE_RX_POWER, "interface_transceiver_lane_rx_power", "The receive power of a transceiver lane.", Gauge, ["node", "iface_name", "lane_id"]);
descriptor!(TRANSCEIVER_LANE_ERRORS, "interface_transceiver_lane_errors", "The number of errors of a transceiver lane.", Counter, ["node", "iface_name", "lane_id"]);

// Routing
descriptor!(BGP_PEER_UP, "bgp_peer_up", "Whether a BGP session is established (1) or not (0).", Gauge, ["node", "vrf", "neighbor", "remote_as"]);
descriptor!(BGP_PEER_PREFIXES_RECEIVED, "bgp_peer_prefixes_received", "The number of prefixes received from a BGP peer.", Gauge, ["node", "vrf", "neighbor"]);
descriptor!(BGP_PEER_UPTIME, "bgp_peer_uptime_seconds", "The time a BGP session has been in its current state.", Gauge, ["node", "vrf", "neighbor"]);

static CATALOG: &[&MetricDescriptor] = &[
    &NODE_UP,
    &NODE_NAME,
    &NODE_ERRORS,
    &NODE_NEXT_POLL,
    &NODE_SCRAPE_TIME,
    &NODE_HOSTNAME,
    &NODE_ID,
    &IFACE_NAME,
    &IFACE_LOCAL_INDEX,
    &IFACE_DESCR,
    &IFACE_BANDWIDTH,
    &IFACE_DELAY,
    &IFACE_RELIABILITY,
    &IFACE_RX_LOAD,
    &IFACE_TX_LOAD,
    &IFACE_INPUT_BYTES,
    &IFACE_INPUT_PACKETS,
    &IFACE_INPUT_UCAST_PACKETS,
    &IFACE_INPUT_BCAST_PACKETS,
    &IFACE_INPUT_MCAST_PACKETS,
    &IFACE_INPUT_JUMBO_PACKETS,
    &IFACE_INPUT_DISCARDS,
    &IFACE_INPUT_ERRORS,
    &IFACE_INPUT_FRAME_ERRORS,
    &IFACE_INPUT_OVERRUNS,
    &IFACE_INPUT_PAUSE,
    &IFACE_OUTPUT_BYTES,
    &IFACE_OUTPUT_PACKETS,
    &IFACE_OUTPUT_UCAST_PACKETS,
    &IFACE_OUTPUT_BCAST_PACKETS,
    &IFACE_OUTPUT_MCAST_PACKETS,
    &IFACE_OUTPUT_JUMBO_PACKETS,
    &IFACE_OUTPUT_DISCARDS,
    &IFACE_OUTPUT_ERRORS,
    &IFACE_OUTPUT_UNDERRUNS,
    &IFACE_OUTPUT_PAUSE,
    &IFACE_COLLISIONS,
    &IFACE_LATE_COLLISIONS,
    &IFACE_CRC_ERRORS,
    &IFACE_RUNTS,
    &IFACE_NO_CARRIER,
    &IFACE_LOST_CARRIER,
    &IFACE_RESETS,
    &IFACE_BABBLES,
    &IFACE_BAD_ETHTYPE_DROPS,
    &IFACE_BAD_PROTO_DROPS,
    &IFACE_DEFERRED,
    &IFACE_DRIBBLE,
    &IFACE_IGNORED,
    &IFACE_INPUT_COMPRESSED,
    &IFACE_INPUT_FIFO,
    &IFACE_INPUT_IFACE_DOWN_DROPS,
    &IFACE_INPUT_UCAST_BYTES,
    &IFACE_NO_BUFFER,
    &IFACE_OUTPUT_CARRIER_ERRORS,
    &IFACE_OUTPUT_FIFO,
    &IFACE_OUTPUT_UCAST_BYTES,
    &IFACE_STORM_SUPPRESSION,
    &IFACE_WATCHDOG,
    &IFACE_BEACON_ENABLED,
    &IFACE_AUTO_NEGOTIATION_ENABLED,
    &IFACE_MDIX_ENABLED,
    &IFACE_MTU,
    &IFACE_SPEED,
    &IFACE_DUPLEX,
    &IFACE_ENCAPSULATED_VLAN,
    &IFACE_STATE,
    &IFACE_ADMIN_STATE,
    &IFACE_SUBINTERFACE,
    &IFACE_ROUTED_MODE,
    &IFACE_ACCESS_MODE,
    &IFACE_IP_ADDRESS,
    &IFACE_HW_ADDRESS,
    &VLAN_ID,
    &VLAN_NAME,
    &VLAN_STATE,
    &VLAN_SHUTDOWN_STATE,
    &FAN_UP,
    &PS_UP,
    &PS_POWER_INPUT,
    &PS_POWER_OUTPUT,
    &PS_POWER_CAPACITY,
    &SENSOR_UP,
    &SENSOR_TEMPERATURE,
    &SENSOR_THRESHOLD_HIGH,
    &SENSOR_THRESHOLD_LOW,
    &PROCESSES_RUNNING,
    &PROCESSES_TOTAL,
    &MEMORY_TOTAL,
    &MEMORY_FREE,
    &MEMORY_USED,
    &CPU_TOTAL_IDLE,
    &CPU_TOTAL_KERNEL,
    &CPU_TOTAL_USER,
    &CPU_IDLE,
    &CPU_KERNEL,
    &CPU_USER,
    &TRANSCEIVER,
    &TRANSCEIVER_LANE_TEMPERATURE,
    &TRANSCEIVER_LANE_VOLTAGE,
    &TRANSCEIVER_LANE_CURRENT,
    &TRANSCEIVER_LANE_TX_POWER,
    &TRANSCEIVER_LANE_RX_POWER,
    &TRANSCEIVER_LANE_ERRORS,
    &BGP_PEER_UP,
    &BGP_PEER_PREFIXES_RECEIVED,
    &BGP_PEER_UPTIME,
];

/// Every metric the exporter may emit, independent of any node state
pub fn describe() -> &'static [&'static MetricDescriptor] {
    CATALOG
}

/// Plain-text table of the catalog, printed by `--metrics`
pub fn catalog_table() -> String {
    let mut out = String::new();
    for desc in describe() {
        let kind = match desc.kind {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        };
        out.push_str(&format!(
            "{:<48} {:<8} {:<40} {}\n",
            desc.name,
            kind,
            desc.labels.join(","),
            desc.help
        ));
    }
    out
}

/// One metric family of the catalog, backed by a labeled vector
enum Family {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

impl Family {
    fn new(desc: &MetricDescriptor) -> prometheus::Result<Self> {
        let opts = Opts::new(desc.name, desc.help);
        Ok(match desc.kind {
            MetricKind::Gauge => Family::Gauge(GaugeVec::new(opts, desc.labels)?),
            MetricKind::Counter => Family::Counter(CounterVec::new(opts, desc.labels)?),
        })
    }

    fn set(&self, metric: &Metric) -> prometheus::Result<()> {
        let values: Vec<&str> = metric.label_values.iter().map(String::as_str).collect();
        match self {
            Family::Gauge(vec) => vec.get_metric_with_label_values(values.as_slice())?.set(metric.value),
            Family::Counter(vec) => {
                let counter = vec.get_metric_with_label_values(values.as_slice())?;
                counter.reset();
                counter.inc_by(metric.value.max(0.0));
            }
        }
        Ok(())
    }

    fn collector(&self) -> &dyn Collector {
        match self {
            Family::Gauge(vec) => vec as &dyn Collector,
            Family::Counter(vec) => vec as &dyn Collector,
        }
    }
}

/// Prometheus collector exposing a fixed set of metrics
///
/// Built per request from a node snapshot; it is the only collector registered in
/// the request's registry. Families without samples are left out of the output.
pub struct SnapshotCollector {
    families: Vec<Family>,
    used: Vec<bool>,
}

impl SnapshotCollector {
    pub fn new(metrics: Vec<Metric>) -> prometheus::Result<Self> {
        let families = describe()
            .iter()
            .map(|d| Family::new(d))
            .collect::<prometheus::Result<Vec<_>>>()?;
        let index: HashMap<&'static str, usize> = describe()
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name, i))
            .collect();

        let mut used = vec![false; families.len()];
        for metric in &metrics {
            let Some(&i) = index.get(metric.name()) else {
                continue;
            };
            families[i].set(metric)?;
            used[i] = true;
        }
        Ok(Self { families, used })
    }
}

impl Collector for SnapshotCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.families
            .iter()
            .flat_map(|f| f.collector().desc())
            .collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.families
            .iter()
            .zip(&self.used)
            .filter(|(_, used)| **used)
            .flat_map(|(f, _)| f.collector().collect())
            .collect()
    }
}

/// Render a registry in Prometheus text format
pub fn render(registry: &Registry) -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Render a set of metrics through a registry holding only them
pub fn render_snapshot(metrics: Vec<Metric>) -> anyhow::Result<String> {
    let registry = Registry::new();
    registry.register(Box::new(SnapshotCollector::new(metrics)?))?;
    render(&registry)
}
