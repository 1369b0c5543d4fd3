//! Network Nodes and the Scrape Orchestrator
//!
//! A [`Node`] is one managed device together with its cached scrape state. All
//! mutable state lives behind a single `tokio::sync::RwLock`:
//!
//! - [`Node::gather_metrics`] holds the write lock for the whole gather cycle,
//!   including the concurrent category fan-out, so two cycles of the same node never
//!   overlap. A caller arriving while a cycle runs waits, then usually hits the TTL
//!   gate and reuses the fresh snapshot.
//! - [`Node::collect`] first triggers a gather, then reads the snapshot under the
//!   read lock.
//!
//! # Gather cycle
//!
//! ```text
//! Idle ──(now < next_poll)──────────────────────────────► Idle (cache hit)
//!   │
//!   └─► Gathering ── credential failover ──┬─ ok ──► identity + fan-out ──► Up
//!                                          └─ exhausted ─────────────────► Down
//! ```
//!
//! Both terminal states append the five health metrics, push `next_poll` forward by
//! the poll interval and stamp the cycle time.

use crate::collectors::{self, node_uuid, Category, CollectionContext, EntityIds};
use crate::credentials::{Credential, CredentialStore};
use crate::device::{DeviceConnector, Target};
use crate::metrics::{
    Metric, NODE_ERRORS, NODE_HOSTNAME, NODE_ID, NODE_NAME, NODE_NEXT_POLL, NODE_SCRAPE_TIME,
    NODE_UP,
};
use chrono::{SecondsFormat, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Outcome of the most recent gather cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrapeResult {
    #[default]
    Unknown,
    Success,
    Failure,
}

impl fmt::Display for ScrapeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeResult::Unknown => write!(f, "unknown"),
            ScrapeResult::Success => write!(f, "success"),
            ScrapeResult::Failure => write!(f, "failure"),
        }
    }
}

/// Mutable scrape state of a node
#[derive(Debug)]
struct NodeState {
    credentials: CredentialStore,
    poll_interval_seconds: u64,
    next_poll: i64,
    last_result: ScrapeResult,
    last_timestamp: Option<String>,
    error_count: u64,
    snapshot: Vec<Metric>,
    module: String,
    subsystems: BTreeSet<Category>,
    snapshot_subsystems: BTreeSet<Category>,
}

/// Read-only view of a node for reporting
#[derive(Debug, Clone)]
pub struct NodeSummary {
    pub name: String,
    pub uuid: String,
    pub module: String,
    /// Selection bound by the latest request
    pub subsystems: Vec<Category>,
    /// Selection the current snapshot was gathered with
    pub snapshot_subsystems: Vec<Category>,
    pub last_result: ScrapeResult,
    pub last_timestamp: Option<String>,
    pub error_count: u64,
    pub next_poll: i64,
    pub credentials: Vec<Credential>,
}

/// One managed network device
pub struct Node {
    name: String,
    uuid: String,
    target: Target,
    connector: Arc<dyn DeviceConnector>,
    entity_ids: EntityIds,
    state: RwLock<NodeState>,
}

impl Node {
    pub fn new(name: impl Into<String>, target: Target, connector: Arc<dyn DeviceConnector>) -> Self {
        let name = name.into();
        let uuid = node_uuid(&name);
        Self {
            uuid: uuid.simple().to_string(),
            entity_ids: EntityIds::new(uuid),
            name,
            target,
            connector,
            state: RwLock::new(NodeState {
                credentials: CredentialStore::default(),
                poll_interval_seconds: 0,
                next_poll: 0,
                last_result: ScrapeResult::Unknown,
                last_timestamp: None,
                error_count: 0,
                snapshot: Vec::new(),
                module: "unknown".to_string(),
                subsystems: BTreeSet::from([Category::Interfaces]),
                snapshot_subsystems: BTreeSet::new(),
            }),
        }
    }

    pub fn with_credentials(mut self, credentials: Vec<Credential>) -> Self {
        self.state.get_mut().credentials.replace(credentials);
        self
    }

    pub fn with_poll_interval(mut self, seconds: u64) -> Self {
        self.state.get_mut().poll_interval_seconds = seconds;
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.state.get_mut().module = module.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn entity_ids(&self) -> &EntityIds {
        &self.entity_ids
    }

    /// Replace the credential list wholesale
    pub async fn set_credentials(&self, credentials: Vec<Credential>) {
        self.state.write().await.credentials.replace(credentials);
    }

    /// Apply the default poll interval to a node that has none
    pub async fn inherit_poll_interval(&self, seconds: u64) {
        let mut state = self.state.write().await;
        if state.poll_interval_seconds == 0 {
            state.poll_interval_seconds = seconds;
        }
    }

    /// Bind the module and subsystem selection of the current request
    pub async fn select(&self, module: &str, subsystems: &[Category]) {
        let mut state = self.state.write().await;
        state.module = module.to_string();
        state.subsystems = subsystems.iter().copied().collect();
    }

    pub async fn summary(&self) -> NodeSummary {
        let state = self.state.read().await;
        NodeSummary {
            name: self.name.clone(),
            uuid: self.uuid.clone(),
            module: state.module.clone(),
            subsystems: state.subsystems.iter().copied().collect(),
            snapshot_subsystems: state.snapshot_subsystems.iter().copied().collect(),
            last_result: state.last_result,
            last_timestamp: state.last_timestamp.clone(),
            error_count: state.error_count,
            next_poll: state.next_poll,
            credentials: state.credentials.credentials().to_vec(),
        }
    }

    /// Current snapshot, without triggering a gather
    pub async fn snapshot(&self) -> Vec<Metric> {
        self.state.read().await.snapshot.clone()
    }

    /// Run one gather cycle unless the previous one is still fresh.
    ///
    /// Never fails: authentication and category errors are folded into the
    /// snapshot's health metrics and the error counter.
    pub async fn gather_metrics(&self) {
        let mut state = self.state.write().await;
        debug!("{}: gather_metrics() locked for {}", self.uuid, self.name);

        let now = Utc::now();
        if now.timestamp() < state.next_poll {
            debug!("{}: snapshot still fresh until {}", self.uuid, state.next_poll);
            return;
        }

        let start = Instant::now();
        state.snapshot.clear();
        state.snapshot_subsystems.clear();

        let client = self.connector.connect(&self.target);
        let up = match state
            .credentials
            .authenticate(&self.uuid, client.as_ref())
            .await
        {
            Ok(session) => {
                debug!(
                    "{}: hostname: {}, board id: {}",
                    self.uuid, session.info.hostname, session.info.processor_board_id
                );
                state.snapshot.push(Metric::new(
                    &NODE_HOSTNAME,
                    1.0,
                    vec![self.uuid.clone(), session.info.hostname.clone()],
                ));
                state.snapshot.push(Metric::new(
                    &NODE_ID,
                    1.0,
                    vec![self.uuid.clone(), session.info.processor_board_id.clone()],
                ));

                let ctx = CollectionContext {
                    client,
                    node: self.uuid.clone(),
                    entity_ids: self.entity_ids.clone(),
                };
                let categories: Vec<Category> = state.subsystems.iter().copied().collect();
                let report = collectors::fan_out(&ctx, &categories).await;
                state.snapshot_subsystems = state.subsystems.clone();
                state.error_count += report.failures;
                state.snapshot.extend(report.metrics);
                true
            }
            Err(e) => {
                info!("{}: {} (target: {})", self.uuid, e, self.target.authority());
                state.error_count += 1;
                false
            }
        };

        let next_poll = now.timestamp() + state.poll_interval_seconds as i64;
        state.next_poll = state.next_poll.max(next_poll);
        state.last_result = if up {
            ScrapeResult::Success
        } else {
            ScrapeResult::Failure
        };
        state.last_timestamp = Some(now.to_rfc3339_opts(SecondsFormat::Secs, true));

        let health = self.health_metrics(&state, up, start.elapsed().as_secs_f64());
        state.snapshot.extend(health);
        debug!(
            "{}: gather_metrics() produced {} metrics",
            self.uuid,
            state.snapshot.len()
        );
    }

    /// Pull side: gather (or hit the cache), then read the snapshot.
    ///
    /// An empty snapshot falls back to the minimal down set so that every pull
    /// reports identity and up/down status.
    pub async fn collect(&self) -> Vec<Metric> {
        let start = Instant::now();
        self.gather_metrics().await;

        let state = self.state.read().await;
        if state.snapshot.is_empty() {
            debug!("{}: collect() found no metrics", self.uuid);
            return self.health_metrics(&state, false, start.elapsed().as_secs_f64());
        }
        state.snapshot.clone()
    }

    fn health_metrics(&self, state: &NodeState, up: bool, scrape_seconds: f64) -> Vec<Metric> {
        let node = || vec![self.uuid.clone()];
        vec![
            Metric::new(&NODE_UP, if up { 1.0 } else { 0.0 }, node()),
            Metric::new(
                &NODE_NAME,
                1.0,
                vec![self.uuid.clone(), self.name.clone()],
            ),
            Metric::new(&NODE_ERRORS, state.error_count as f64, node()),
            Metric::new(&NODE_NEXT_POLL, state.next_poll as f64, node()),
            Metric::new(&NODE_SCRAPE_TIME, scrape_seconds, node()),
        ]
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("uuid", &self.uuid)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
