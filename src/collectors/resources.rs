//! System Resources Metrics Collector
//!
//! # Metrics Produced
//! - `net_node_{running,total}_process_count`
//! - `net_node_memory_{total,free,used}`
//! - `net_node_total_cpu_{idle,kernel,user}`
//! - `net_node_cpu_{idle,kernel,user}` - Labels: node, cpu

use super::{collect_with_handler, Category, CategoryReport, CollectionContext};
use crate::metrics::*;

/// Collects process, memory and CPU usage from a device
///
/// Queries system resources and emits node-wide totals plus one usage series
/// per CPU.
///
/// # Arguments
///
/// * `ctx` - Collection context holding the device client and node identity
///
/// # Returns
///
/// * `CategoryReport` with `CollectionStatus::Success` and the resource metrics
/// * `CategoryReport` with `CollectionStatus::Failed` and no metrics when the query fails
pub async fn collect_resource_metrics(ctx: &CollectionContext) -> CategoryReport {
    collect_with_handler(Category::Resources, ctx.client.resources(), |rsc, out| {
        let totals = [
            (&PROCESSES_RUNNING, rsc.processes.running as f64),
            (&PROCESSES_TOTAL, rsc.processes.total as f64),
            (&MEMORY_TOTAL, rsc.memory.total as f64),
            (&MEMORY_FREE, rsc.memory.free as f64),
            (&MEMORY_USED, rsc.memory.used as f64),
            (&CPU_TOTAL_IDLE, rsc.cpu.idle),
            (&CPU_TOTAL_KERNEL, rsc.cpu.kernel),
            (&CPU_TOTAL_USER, rsc.cpu.user),
        ];
        for (desc, value) in totals {
            out.push(Metric::new(desc, value, vec![ctx.node.clone()]));
        }

        for core in &rsc.cpus {
            let labels = vec![ctx.node.clone(), core.id.to_string()];
            out.push(Metric::new(&CPU_IDLE, core.usage.idle, labels.clone()));
            out.push(Metric::new(&CPU_KERNEL, core.usage.kernel, labels.clone()));
            out.push(Metric::new(&CPU_USER, core.usage.user, labels));
        }
    })
    .await
}
