//! VLAN Metrics Collector
//!
//! # Metrics Produced
//! - `net_vlan_id` - Numeric VLAN id (only when the id is numeric)
//! - `net_vlan_name` - VLAN name (value is always 1)
//! - `net_vlan_state` - active (1), any other value (0)
//! - `net_vlan_shutdown_state` - noshutdown (1), any other value (0)
//!
//! The `vlan` label is the opaque entity id of the VLAN.

use super::{bool_value, collect_with_handler, or_placeholder, Category, CategoryReport};
use super::CollectionContext;
use crate::metrics::{Metric, VLAN_ID, VLAN_NAME, VLAN_SHUTDOWN_STATE, VLAN_STATE};

/// Collects VLAN metrics from a device
///
/// Queries the VLAN table and emits id, name, state and shutdown state per VLAN.
///
/// # Arguments
///
/// * `ctx` - Collection context holding the device client and node identity
///
/// # Returns
///
/// * `CategoryReport` with `CollectionStatus::Success` and the VLAN metrics
/// * `CategoryReport` with `CollectionStatus::Failed` and no metrics when the query fails
pub async fn collect_vlan_metrics(ctx: &CollectionContext) -> CategoryReport {
    collect_with_handler(Category::Vlans, ctx.client.vlans(), |vlans, out| {
        for vlan in vlans {
            let id = ctx.entity_ids.vlan(&vlan.id);
            let labels = vec![ctx.node.clone(), id.clone()];

            if let Ok(number) = vlan.id.parse::<u32>() {
                out.push(Metric::new(&VLAN_ID, number as f64, labels.clone()));
            }
            out.push(Metric::new(
                &VLAN_NAME,
                1.0,
                vec![ctx.node.clone(), id, or_placeholder(&vlan.name)],
            ));
            out.push(Metric::new(
                &VLAN_STATE,
                bool_value(vlan.state == "active"),
                labels.clone(),
            ));
            out.push(Metric::new(
                &VLAN_SHUTDOWN_STATE,
                bool_value(vlan.shutdown_state == "noshutdown"),
                labels,
            ));
        }
    })
    .await
}
