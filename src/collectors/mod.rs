//! Metrics Collectors
//!
//! This module contains one collector per device data category and the fan-out that
//! runs them concurrently within a gather cycle.
//!
//! # Architecture
//!
//! Collectors follow a consistent pattern:
//! - Accept a `CollectionContext` (device client, node label, entity id cache)
//! - Query one device API method
//! - Convert the structured answer into [`Metric`] tuples in a private buffer
//! - Return a [`CategoryReport`] carrying the status and the buffer
//!
//! [`fan_out`] spawns one task per selected category, joins them all, and merges the
//! buffers in category order. Tasks never share a buffer.
//!
//! # Error Handling
//!
//! A failing category is logged as a warning, contributes no metrics and is counted in
//! [`FanOutReport::failures`]; its siblings are unaffected.

use crate::device::DeviceClient;
use crate::error::ExporterError;
use crate::metrics::Metric;
use futures_util::future::join_all;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Label value used in place of an empty descriptive string
pub const EMPTY_PLACEHOLDER: &str = "empty";

/// Independent data categories a device can be queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Interfaces,
    Vlans,
    Environment,
    Resources,
    Transceivers,
    Routing,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Interfaces,
        Category::Vlans,
        Category::Environment,
        Category::Resources,
        Category::Transceivers,
        Category::Routing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Interfaces => "interfaces",
            Category::Vlans => "vlans",
            Category::Environment => "environment",
            Category::Resources => "resources",
            Category::Transceivers => "transceivers",
            Category::Routing => "routing",
        }
    }

    /// Parse a subsystem name; `bgp` is accepted for routing
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bgp" => Some(Category::Routing),
            other => Category::ALL.into_iter().find(|c| c.as_str() == other),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic identifier of a node, derived from its inventory name
pub fn node_uuid(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EntityKind {
    Interface,
    Vlan,
}

/// Opaque per-entity label values, cached for the node's lifetime
///
/// Cloning shares the cache.
#[derive(Debug, Clone)]
pub struct EntityIds {
    node: Uuid,
    cache: Arc<Mutex<HashMap<(EntityKind, String), String>>>,
}

impl EntityIds {
    pub fn new(node: Uuid) -> Self {
        Self {
            node,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn interface(&self, name: &str) -> String {
        self.lookup(EntityKind::Interface, name)
    }

    pub fn vlan(&self, id: &str) -> String {
        self.lookup(EntityKind::Vlan, id)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    fn lookup(&self, kind: EntityKind, name: &str) -> String {
        let node = self.node;
        self.cache
            .lock()
            .entry((kind, name.to_string()))
            .or_insert_with(|| Uuid::new_v5(&node, name.as_bytes()).simple().to_string())
            .clone()
    }
}

/// Shared context passed to all collectors of one cycle
#[derive(Clone)]
pub struct CollectionContext {
    /// Authenticated device client
    pub client: Arc<dyn DeviceClient>,
    /// Node uuid, the first label of every metric
    pub node: String,
    pub entity_ids: EntityIds,
}

/// Status of a category collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    Success,
    /// Collection failed but is non-fatal (already logged as warning)
    Failed,
}

/// What one category contributed to the cycle
#[derive(Debug)]
pub struct CategoryReport {
    pub category: Category,
    pub status: CollectionStatus,
    pub metrics: Vec<Metric>,
}

/// Merged outcome of all categories of one cycle
#[derive(Debug, Default)]
pub struct FanOutReport {
    pub metrics: Vec<Metric>,
    pub failures: u64,
}

/// Helper to reduce boilerplate in collectors
///
/// Wraps an API query with consistent error handling:
/// - On success: `process` fills a fresh buffer, status is `Success`
/// - On error: logs a warning, returns `Failed` with an empty buffer
pub async fn collect_with_handler<T, F, P, E>(
    category: Category,
    query_future: F,
    process: P,
) -> CategoryReport
where
    F: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: FnOnce(T, &mut Vec<Metric>),
{
    match query_future.await {
        Ok(data) => {
            let mut metrics = Vec::new();
            process(data, &mut metrics);
            debug!("Collected {} {} metrics", metrics.len(), category);
            CategoryReport {
                category,
                status: CollectionStatus::Success,
                metrics,
            }
        }
        Err(e) => {
            let error = ExporterError::CategoryCollectionFailed {
                category: category.to_string(),
                reason: e.to_string(),
            };
            warn!("{}", error);
            CategoryReport {
                category,
                status: CollectionStatus::Failed,
                metrics: Vec::new(),
            }
        }
    }
}

async fn collect_category(category: Category, ctx: &CollectionContext) -> CategoryReport {
    match category {
        Category::Interfaces => collect_interface_metrics(ctx).await,
        Category::Vlans => collect_vlan_metrics(ctx).await,
        Category::Environment => collect_environment_metrics(ctx).await,
        Category::Resources => collect_resource_metrics(ctx).await,
        Category::Transceivers => collect_transceiver_metrics(ctx).await,
        Category::Routing => collect_routing_metrics(ctx).await,
    }
}

/// Run the selected categories concurrently and merge their buffers.
///
/// Returns only once every task has finished. Merge order follows `categories`.
pub async fn fan_out(ctx: &CollectionContext, categories: &[Category]) -> FanOutReport {
    let handles = categories.iter().map(|&category| {
        let ctx = ctx.clone();
        tokio::spawn(async move { collect_category(category, &ctx).await })
    });
    let joined = join_all(handles).await;

    let mut report = FanOutReport::default();
    for (category, outcome) in categories.iter().zip(joined) {
        match outcome {
            Ok(CategoryReport {
                status: CollectionStatus::Success,
                metrics,
                ..
            }) => report.metrics.extend(metrics),
            Ok(_) => report.failures += 1,
            Err(e) => {
                warn!("{}: {} collector task aborted: {}", ctx.node, category, e);
                report.failures += 1;
            }
        }
    }
    report
}

/// Encode a boolean device state as a gauge value
pub fn bool_value(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Component status strings reported as `Ok` or `OK` mean healthy
pub fn status_ok(status: &str) -> f64 {
    bool_value(status == "Ok" || status == "OK")
}

/// Replace an empty descriptive string with [`EMPTY_PLACEHOLDER`]
pub fn or_placeholder(value: &str) -> String {
    if value.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

// Collector modules
pub mod environment;
pub mod interfaces;
pub mod resources;
pub mod routing;
pub mod transceivers;
pub mod vlans;

// Re-export collector functions for convenient access
pub use environment::collect_environment_metrics;
pub use interfaces::collect_interface_metrics;
pub use resources::collect_resource_metrics;
pub use routing::collect_routing_metrics;
pub use transceivers::collect_transceiver_metrics;
pub use vlans::collect_vlan_metrics;
