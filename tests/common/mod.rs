//! Shared test fixtures
//!
//! An in-memory device that answers every category with canned data. Valid
//! passwords, failing categories and latency are configurable at runtime.

#![allow(dead_code)]

use async_trait::async_trait;
use network_exporter::collectors::Category;
use network_exporter::credentials::Credential;
use network_exporter::device::types::*;
use network_exporter::device::{DeviceClient, DeviceConnector, Protocol, Target};
use network_exporter::error::{ExporterError, Result};
use network_exporter::metrics::Metric;
use network_exporter::node::Node;
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const HOSTNAME: &str = "ny-sw01.example.net";
pub const BOARD_ID: &str = "FOC1234X0AB";

#[derive(Default)]
pub struct FakeDevice {
    valid_passwords: Mutex<HashSet<String>>,
    failing: Mutex<HashSet<Category>>,
    latency: Mutex<Duration>,
    attempts: Mutex<Vec<String>>,
    auth_calls: AtomicUsize,
    category_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeDevice {
    pub fn accepting(passwords: &[&str]) -> Arc<Self> {
        let device = Self::default();
        device.set_valid_passwords(passwords);
        Arc::new(device)
    }

    pub fn set_valid_passwords(&self, passwords: &[&str]) {
        *self.valid_passwords.lock() = passwords.iter().map(|p| p.to_string()).collect();
    }

    pub fn fail_category(&self, category: Category) {
        self.failing.lock().insert(category);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    /// Usernames in the order they were tried
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().clone()
    }

    pub fn clear_attempts(&self) {
        self.attempts.lock().clear();
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn category<T>(&self, category: Category, data: T) -> Result<T> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.lock().contains(&category) {
            return Err(ExporterError::DeviceApi(format!("{} unavailable", category)));
        }
        Ok(data)
    }
}

#[async_trait]
impl DeviceClient for FakeDevice {
    async fn authenticate(&self, username: &str, password: &SecretString) -> Result<SystemInfo> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.attempts.lock().push(username.to_string());

        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.valid_passwords.lock().contains(password.expose_secret()) {
            Ok(SystemInfo {
                hostname: HOSTNAME.to_string(),
                chassis_id: "Nexus9000 C93180YC-EX chassis".to_string(),
                processor_board_id: BOARD_ID.to_string(),
            })
        } else {
            Err(ExporterError::Auth(format!("user {} rejected", username)))
        }
    }

    async fn interfaces(&self) -> Result<Vec<Interface>> {
        self.category(Category::Interfaces, sample_interfaces()).await
    }

    async fn vlans(&self) -> Result<Vec<Vlan>> {
        self.category(Category::Vlans, sample_vlans()).await
    }

    async fn environment(&self) -> Result<Environment> {
        self.category(Category::Environment, sample_environment()).await
    }

    async fn resources(&self) -> Result<SystemResources> {
        self.category(Category::Resources, sample_resources()).await
    }

    async fn transceivers(&self) -> Result<Vec<Transceiver>> {
        self.category(Category::Transceivers, sample_transceivers()).await
    }

    async fn bgp_peers(&self) -> Result<Vec<BgpPeer>> {
        self.category(Category::Routing, sample_bgp_peers()).await
    }
}

/// Hands out the same fake device for every target
pub struct FakeConnector {
    pub device: Arc<FakeDevice>,
}

impl FakeConnector {
    pub fn new(device: Arc<FakeDevice>) -> Arc<Self> {
        Arc::new(Self { device })
    }
}

impl DeviceConnector for FakeConnector {
    fn connect(&self, _target: &Target) -> Arc<dyn DeviceClient> {
        self.device.clone()
    }
}

pub fn target(host: &str) -> Target {
    Target::new(host, Some(443), Protocol::Https)
}

pub fn credentials(pairs: &[(&str, &str)]) -> Vec<Credential> {
    pairs
        .iter()
        .map(|(user, pass)| Credential::new(*user, *pass))
        .collect()
}

/// A node backed by `device`, with one working credential
pub fn node(name: &str, device: Arc<FakeDevice>, poll_interval: u64) -> Node {
    Node::new(name, target(name), FakeConnector::new(device))
        .with_credentials(credentials(&[("admin", "good")]))
        .with_poll_interval(poll_interval)
        .with_module("cisco_nxos")
}

pub fn find<'a>(metrics: &'a [Metric], name: &str) -> Vec<&'a Metric> {
    metrics.iter().filter(|m| m.name() == name).collect()
}

pub fn value(metrics: &[Metric], name: &str) -> Option<f64> {
    metrics.iter().find(|m| m.name() == name).map(|m| m.value)
}

pub fn sample_interfaces() -> Vec<Interface> {
    vec![
        Interface {
            name: "Ethernet1/1".to_string(),
            local_index: 436207616,
            description: String::new(),
            props: InterfaceProps {
                mtu: 9216,
                speed: "10 Gb/s".to_string(),
                duplex: "full".to_string(),
                state: "up".to_string(),
                admin_state: "up".to_string(),
                ip_address: "10.0.0.1".to_string(),
                ip_mask: 30,
                mode: "routed".to_string(),
                hw_addr: "00:1b:54:c2:4a:01".to_string(),
                ..Default::default()
            },
            counters: InterfaceCounters {
                input_bytes: 1_000_000,
                output_bytes: 2_000_000,
                crc_errors: 3,
                input_ucast_bytes: 900_000,
                output_ucast_bytes: 1_800_000,
                storm_suppression: 7,
                watchdog: 2,
                no_buffer: 5,
                ..Default::default()
            },
            ..Default::default()
        },
        Interface {
            name: "Ethernet1/2".to_string(),
            local_index: 436211712,
            description: "uplink to core".to_string(),
            props: InterfaceProps {
                mtu: 1500,
                speed: "auto-speed".to_string(),
                duplex: "auto".to_string(),
                state: "down".to_string(),
                admin_state: "up".to_string(),
                mode: "access".to_string(),
                ..Default::default()
            },
            ..Default::default()
        },
    ]
}

pub fn sample_vlans() -> Vec<Vlan> {
    vec![
        Vlan {
            id: "10".to_string(),
            name: "users".to_string(),
            state: "active".to_string(),
            shutdown_state: "noshutdown".to_string(),
        },
        Vlan {
            id: "20".to_string(),
            name: String::new(),
            state: "suspend".to_string(),
            shutdown_state: "shutdown".to_string(),
        },
    ]
}

pub fn sample_environment() -> Environment {
    Environment {
        fans: vec![
            Fan {
                name: "Fan1(sys_fan1)".to_string(),
                status: "Ok".to_string(),
            },
            Fan {
                name: "Fan2(sys_fan2)".to_string(),
                status: "Failure".to_string(),
            },
        ],
        power_supplies: vec![PowerSupply {
            id: 1,
            model: "NXA-PAC-650W-PE".to_string(),
            status: "OK".to_string(),
            power_input: 180.0,
            power_output: 165.0,
            power_capacity: 650.0,
        }],
        sensors: vec![Sensor {
            name: "FRONT".to_string(),
            module: 1,
            status: "Ok".to_string(),
            temperature: 31.0,
            threshold_high: 80.0,
            threshold_low: 70.0,
        }],
    }
}

pub fn sample_resources() -> SystemResources {
    SystemResources {
        processes: ProcessUsage {
            running: 3,
            total: 712,
        },
        memory: MemoryUsage {
            total: 24_632_252,
            free: 14_152_140,
            used: 10_480_112,
        },
        cpu: CpuUsage {
            idle: 95.5,
            kernel: 3.0,
            user: 1.5,
        },
        cpus: vec![
            CpuCore {
                id: 0,
                usage: CpuUsage {
                    idle: 94.0,
                    kernel: 4.0,
                    user: 2.0,
                },
            },
            CpuCore {
                id: 1,
                usage: CpuUsage {
                    idle: 97.0,
                    kernel: 2.0,
                    user: 1.0,
                },
            },
        ],
    }
}

pub fn sample_transceivers() -> Vec<Transceiver> {
    vec![Transceiver {
        interface: "Ethernet1/1".to_string(),
        serial_number: "AVF1234ABCD".to_string(),
        vendor: "CISCO-AVAGO".to_string(),
        lanes: vec![TransceiverLane {
            id: 1,
            temperature: 34.5,
            voltage: 3.3,
            current: 6.4,
            tx_power: -2.1,
            rx_power: -3.4,
            errors: 0.0,
        }],
    }]
}

pub fn sample_bgp_peers() -> Vec<BgpPeer> {
    vec![
        BgpPeer {
            neighbor: "10.0.0.2".to_string(),
            remote_as: 65001,
            vrf: String::new(),
            state: "Established".to_string(),
            prefixes_received: 120,
            uptime_seconds: 86_400,
        },
        BgpPeer {
            neighbor: "10.0.1.2".to_string(),
            remote_as: 65002,
            vrf: "mgmt".to_string(),
            state: "Idle".to_string(),
            prefixes_received: 0,
            uptime_seconds: 0,
        },
    ]
}
