//! Transceiver Metrics Collector
//!
//! Collects optics inventory and per-lane diagnostics.
//!
//! # Metrics Produced
//! - `net_interface_transceiver` - Labels: node, iface_name, serial, vendor (value is always 1)
//! - `net_interface_transceiver_lane_*` - Labels: node, iface_name, lane_id

use super::{collect_with_handler, or_placeholder, Category, CategoryReport, CollectionContext};
use crate::metrics::*;

/// Collects transceiver metrics from a device
///
/// Queries the transceivers attached to interfaces and emits one identity metric
/// per module and the optical readings of each lane.
///
/// # Arguments
///
/// * `ctx` - Collection context holding the device client and node identity
///
/// # Returns
///
/// * `CategoryReport` with `CollectionStatus::Success` and the transceiver metrics
/// * `CategoryReport` with `CollectionStatus::Failed` and no metrics when the query fails
pub async fn collect_transceiver_metrics(ctx: &CollectionContext) -> CategoryReport {
    collect_with_handler(
        Category::Transceivers,
        ctx.client.transceivers(),
        |transceivers, out| {
            for t in &transceivers {
                out.push(Metric::new(
                    &TRANSCEIVER,
                    1.0,
                    vec![
                        ctx.node.clone(),
                        t.interface.clone(),
                        or_placeholder(&t.serial_number),
                        or_placeholder(&t.vendor),
                    ],
                ));
                for lane in &t.lanes {
                    let labels = vec![ctx.node.clone(), t.interface.clone(), lane.id.to_string()];
                    for (desc, value) in [
                        (&TRANSCEIVER_LANE_TEMPERATURE, lane.temperature),
                        (&TRANSCEIVER_LANE_VOLTAGE, lane.voltage),
                        (&TRANSCEIVER_LANE_CURRENT, lane.current),
                        (&TRANSCEIVER_LANE_TX_POWER, lane.tx_power),
                        (&TRANSCEIVER_LANE_RX_POWER, lane.rx_power),
                        (&TRANSCEIVER_LANE_ERRORS, lane.errors),
                    ] {
                        out.push(Metric::new(desc, value, labels.clone()));
                    }
                }
            }
        },
    )
    .await
}
