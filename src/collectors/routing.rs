//! Routing Metrics Collector
//!
//! Collects BGP peer state.
//!
//! # Metrics Produced
//! - `net_bgp_peer_up` - Established (1), any other state (0)
//!   - Labels: node, vrf, neighbor, remote_as
//! - `net_bgp_peer_prefixes_received` - Labels: node, vrf, neighbor
//! - `net_bgp_peer_uptime_seconds` - Labels: node, vrf, neighbor

use super::{bool_value, collect_with_handler, Category, CategoryReport, CollectionContext};
use crate::metrics::{Metric, BGP_PEER_PREFIXES_RECEIVED, BGP_PEER_UP, BGP_PEER_UPTIME};

/// VRF label used when the device omits one
const DEFAULT_VRF: &str = "default";

/// Collects BGP peer metrics from a device
///
/// Queries BGP peers and emits session state, received prefixes and uptime.
/// Peers without a VRF are reported under `default`.
///
/// # Arguments
///
/// * `ctx` - Collection context holding the device client and node identity
///
/// # Returns
///
/// * `CategoryReport` with `CollectionStatus::Success` and the BGP peer metrics
/// * `CategoryReport` with `CollectionStatus::Failed` and no metrics when the query fails
pub async fn collect_routing_metrics(ctx: &CollectionContext) -> CategoryReport {
    collect_with_handler(Category::Routing, ctx.client.bgp_peers(), |peers, out| {
        for peer in peers {
            let vrf = if peer.vrf.is_empty() {
                DEFAULT_VRF.to_string()
            } else {
                peer.vrf.clone()
            };
            out.push(Metric::new(
                &BGP_PEER_UP,
                bool_value(peer.state.eq_ignore_ascii_case("established")),
                vec![
                    ctx.node.clone(),
                    vrf.clone(),
                    peer.neighbor.clone(),
                    peer.remote_as.to_string(),
                ],
            ));
            let labels = vec![ctx.node.clone(), vrf, peer.neighbor.clone()];
            out.push(Metric::new(
                &BGP_PEER_PREFIXES_RECEIVED,
                peer.prefixes_received as f64,
                labels.clone(),
            ));
            out.push(Metric::new(
                &BGP_PEER_UPTIME,
                peer.uptime_seconds as f64,
                labels,
            ));
        }
    })
    .await
}
