//! Interface Metrics Collector
//!
//! Collects interface identity, load metrics, traffic and error counters, and
//! link properties.
//!
//! # Metrics Produced
//! - `net_iface_name`, `net_iface_descr` - Info metrics (value is always 1)
//!   - Labels: node, iface, iface_name / descr
//! - `net_iface_*` load metrics and counters
//!   - Labels: node, iface
//! - `net_iface_speed` - Link speed normalized to Mb/s
//! - `net_iface_duplex` - auto (3), full (2), half (1), other (0)
//! - `net_iface_ip_address`, `net_iface_hw_address` - Only when the device reports one
//!
//! The `iface` label is the opaque entity id from [`EntityIds`](super::EntityIds),
//! stable across cycles for the same interface name.

use super::{bool_value, collect_with_handler, or_placeholder, Category, CategoryReport};
use super::CollectionContext;
use crate::device::types::{Interface, InterfaceCounters};
use crate::metrics::*;

/// Ordinal encoding of a duplex mode
pub fn duplex_value(duplex: &str) -> f64 {
    match duplex {
        "auto" => 3.0,
        "full" => 2.0,
        "half" => 1.0,
        _ => 0.0,
    }
}

/// Normalize a speed string such as `"10 Gb/s"` to Mb/s.
///
/// `auto-speed`, unparsable values and strings without a unit yield 0. An
/// unrecognized unit is treated as Mb/s.
pub fn parse_speed_mbps(speed: &str) -> f64 {
    if speed == "auto-speed" {
        return 0.0;
    }
    let mut parts = speed.split(' ');
    let (Some(value), Some(unit)) = (parts.next(), parts.next()) else {
        return 0.0;
    };
    let value: f64 = value.parse().unwrap_or(0.0);
    let multiplier = match unit {
        "Tb/s" => 1_000_000.0,
        "Gb/s" => 1_000.0,
        _ => 1.0,
    };
    if value > 0.0 {
        value * multiplier
    } else {
        0.0
    }
}

fn counters(c: &InterfaceCounters) -> [(&'static MetricDescriptor, u64); 44] {
    [
        (&IFACE_INPUT_BYTES, c.input_bytes),
        (&IFACE_INPUT_PACKETS, c.input_packets),
        (&IFACE_INPUT_UCAST_PACKETS, c.input_unicast_packets),
        (&IFACE_INPUT_BCAST_PACKETS, c.input_broadcast_packets),
        (&IFACE_INPUT_MCAST_PACKETS, c.input_multicast_packets),
        (&IFACE_INPUT_JUMBO_PACKETS, c.input_jumbo_packets),
        (&IFACE_INPUT_DISCARDS, c.input_discards),
        (&IFACE_INPUT_ERRORS, c.input_errors),
        (&IFACE_INPUT_FRAME_ERRORS, c.input_frame_errors),
        (&IFACE_INPUT_OVERRUNS, c.input_overruns),
        (&IFACE_INPUT_PAUSE, c.input_pause),
        (&IFACE_OUTPUT_BYTES, c.output_bytes),
        (&IFACE_OUTPUT_PACKETS, c.output_packets),
        (&IFACE_OUTPUT_UCAST_PACKETS, c.output_unicast_packets),
        (&IFACE_OUTPUT_BCAST_PACKETS, c.output_broadcast_packets),
        (&IFACE_OUTPUT_MCAST_PACKETS, c.output_multicast_packets),
        (&IFACE_OUTPUT_JUMBO_PACKETS, c.output_jumbo_packets),
        (&IFACE_OUTPUT_DISCARDS, c.output_discards),
        (&IFACE_OUTPUT_ERRORS, c.output_errors),
        (&IFACE_OUTPUT_UNDERRUNS, c.output_underruns),
        (&IFACE_OUTPUT_PAUSE, c.output_pause),
        (&IFACE_COLLISIONS, c.collisions),
        (&IFACE_LATE_COLLISIONS, c.late_collisions),
        (&IFACE_CRC_ERRORS, c.crc_errors),
        (&IFACE_RUNTS, c.runts),
        (&IFACE_NO_CARRIER, c.no_carrier),
        (&IFACE_LOST_CARRIER, c.lost_carrier),
        (&IFACE_RESETS, c.resets),
        (&IFACE_BABBLES, c.babbles),
        (&IFACE_BAD_ETHTYPE_DROPS, c.bad_ethtype_drops),
        (&IFACE_BAD_PROTO_DROPS, c.bad_proto_drops),
        (&IFACE_DEFERRED, c.deferred),
        (&IFACE_DRIBBLE, c.dribble),
        (&IFACE_IGNORED, c.ignored),
        (&IFACE_INPUT_COMPRESSED, c.input_compressed),
        (&IFACE_INPUT_FIFO, c.input_fifo),
        (&IFACE_INPUT_IFACE_DOWN_DROPS, c.input_iface_down_drops),
        (&IFACE_INPUT_UCAST_BYTES, c.input_ucast_bytes),
        (&IFACE_NO_BUFFER, c.no_buffer),
        (&IFACE_OUTPUT_CARRIER_ERRORS, c.output_carrier_errors),
        (&IFACE_OUTPUT_FIFO, c.output_fifo),
        (&IFACE_OUTPUT_UCAST_BYTES, c.output_ucast_bytes),
        (&IFACE_STORM_SUPPRESSION, c.storm_suppression),
        (&IFACE_WATCHDOG, c.watchdog),
    ]
}

fn interface_metrics(ctx: &CollectionContext, iface: &Interface, out: &mut Vec<Metric>) {
    let node = ctx.node.clone();
    let id = ctx.entity_ids.interface(&iface.name);
    let labels = || vec![node.clone(), id.clone()];
    let props = &iface.props;

    out.push(Metric::new(
        &IFACE_NAME,
        1.0,
        vec![node.clone(), id.clone(), iface.name.clone()],
    ));
    out.push(Metric::new(
        &IFACE_DESCR,
        1.0,
        vec![node.clone(), id.clone(), or_placeholder(&iface.description)],
    ));

    let gauges = [
        (&IFACE_LOCAL_INDEX, iface.local_index as f64),
        (&IFACE_BANDWIDTH, iface.metrics.bandwidth as f64),
        (&IFACE_DELAY, iface.metrics.delay as f64),
        (&IFACE_RELIABILITY, iface.metrics.reliability as f64),
        (&IFACE_RX_LOAD, iface.metrics.rxload as f64),
        (&IFACE_TX_LOAD, iface.metrics.txload as f64),
        (&IFACE_BEACON_ENABLED, bool_value(props.beacon_enabled)),
        (
            &IFACE_AUTO_NEGOTIATION_ENABLED,
            bool_value(props.auto_negotiation_enabled),
        ),
        (&IFACE_MDIX_ENABLED, bool_value(props.mdix_enabled)),
        (&IFACE_MTU, props.mtu as f64),
        (&IFACE_SPEED, parse_speed_mbps(&props.speed)),
        (&IFACE_DUPLEX, duplex_value(&props.duplex)),
        (&IFACE_ENCAPSULATED_VLAN, props.encapsulated_vlan as f64),
        (&IFACE_STATE, bool_value(props.state == "up")),
        (&IFACE_ADMIN_STATE, bool_value(props.admin_state == "up")),
        (&IFACE_SUBINTERFACE, bool_value(!props.parent_interface.is_empty())),
        (&IFACE_ROUTED_MODE, bool_value(!props.ip_address.is_empty())),
        (&IFACE_ACCESS_MODE, bool_value(props.mode == "access")),
    ];
    for (desc, value) in gauges {
        out.push(Metric::new(desc, value, labels()));
    }
    for (desc, value) in counters(&iface.counters) {
        out.push(Metric::new(desc, value as f64, labels()));
    }

    if !props.ip_address.is_empty() {
        out.push(Metric::new(
            &IFACE_IP_ADDRESS,
            1.0,
            vec![
                node.clone(),
                id.clone(),
                format!("{}/{}", props.ip_address, props.ip_mask),
            ],
        ));
    }
    if !props.hw_addr.is_empty() {
        out.push(Metric::new(
            &IFACE_HW_ADDRESS,
            1.0,
            vec![node.clone(), id.clone(), props.hw_addr.clone()],
        ));
    }
}

/// Collects interface metrics from a device
///
/// Queries the interface list and emits identity, load, counter and link
/// property metrics for each interface, keyed by its stable entity id.
///
/// # Arguments
///
/// * `ctx` - Collection context holding the device client and node identity
///
/// # Returns
///
/// * `CategoryReport` with `CollectionStatus::Success` and the interface metrics
/// * `CategoryReport` with `CollectionStatus::Failed` and no metrics when the query fails
pub async fn collect_interface_metrics(ctx: &CollectionContext) -> CategoryReport {
    collect_with_handler(
        Category::Interfaces,
        ctx.client.interfaces(),
        |interfaces, out| {
            for iface in &interfaces {
                interface_metrics(ctx, iface, out);
            }
        },
    )
    .await
}
