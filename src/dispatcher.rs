//! Node Registry and Scrape Dispatch
//!
//! The [`Dispatcher`] owns every [`Node`] of the process together with the supported
//! modules, the supported subsystems and the valid access tokens. A scrape request is
//! validated in this order:
//!
//! 1. token (403 when absent or unknown)
//! 2. at least one node configured (500)
//! 3. node name present and known (400)
//! 4. module present and supported (400)
//! 5. subsystem list: absent → `interfaces`, `all` → every category, otherwise a
//!    comma-separated list of supported names (400 on the first unsupported entry)
//!
//! A valid request binds the selection onto the node, builds a registry holding only
//! that node's snapshot and renders it. Rejected requests leave node state untouched.

use crate::collectors::Category;
use crate::device::DeviceConnector;
use crate::error::{ExporterError, Result};
use crate::inventory::{Inventory, Vault};
use crate::metrics;
use crate::node::Node;
use axum::http::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Subsystem used when a request does not name any
pub const DEFAULT_SUBSYSTEM: Category = Category::Interfaces;

/// Why a scrape request was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Forbidden")]
    Forbidden,

    #[error("no nodes configured")]
    NoNodes,

    #[error("node parameter is required")]
    MissingNode,

    #[error("unknown node {0:?}")]
    UnknownNode(String),

    #[error("module parameter is required")]
    MissingModule,

    #[error("unsupported module {0:?}")]
    UnsupportedModule(String),

    #[error("unsupported subsystem {0:?}")]
    UnsupportedSubsystem(String),

    #[error("Error rendering metrics: {0}")]
    Render(String),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::Forbidden => StatusCode::FORBIDDEN,
            RequestError::NoNodes | RequestError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Query parameters of one scrape request
#[derive(Debug, Clone, Default)]
pub struct ScrapeRequest {
    pub token: Option<String>,
    pub node: Option<String>,
    pub module: Option<String>,
    pub subsystem: Option<String>,
}

/// A validated request: the resolved node and its selection
#[derive(Debug, Clone)]
pub struct Binding {
    pub node: Arc<Node>,
    pub module: String,
    pub subsystems: Vec<Category>,
}

pub struct Dispatcher {
    nodes: RwLock<HashMap<String, Arc<Node>>>,
    modules: HashSet<String>,
    subsystems: BTreeSet<Category>,
    tokens: Vec<SecretString>,
    connector: Arc<dyn DeviceConnector>,
    poll_interval_seconds: u64,
}

impl Dispatcher {
    pub fn new(
        connector: Arc<dyn DeviceConnector>,
        modules: impl IntoIterator<Item = String>,
        poll_interval_seconds: u64,
    ) -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            modules: modules.into_iter().collect(),
            subsystems: Category::ALL.into_iter().collect(),
            tokens: Vec::new(),
            connector,
            poll_interval_seconds,
        }
    }

    pub fn with_tokens(mut self, tokens: impl IntoIterator<Item = SecretString>) -> Self {
        self.tokens.extend(tokens);
        self
    }

    pub fn modules(&self) -> Vec<String> {
        let mut modules: Vec<String> = self.modules.iter().cloned().collect();
        modules.sort();
        modules
    }

    pub fn authorize(&self, token: Option<&str>) -> bool {
        match token {
            Some(token) if !token.is_empty() => {
                self.tokens.iter().any(|t| t.expose_secret() == token)
            }
            _ => false,
        }
    }

    /// Register a node built elsewhere; an existing node of the same name wins
    pub async fn insert_node(&self, node: Node) -> Arc<Node> {
        node.inherit_poll_interval(self.poll_interval_seconds).await;
        let mut nodes = self.nodes.write().await;
        nodes
            .entry(node.name().to_string())
            .or_insert_with(|| Arc::new(node))
            .clone()
    }

    pub async fn node(&self, name: &str) -> Option<Arc<Node>> {
        self.nodes.read().await.get(name).cloned()
    }

    /// All nodes, sorted by name
    pub async fn nodes(&self) -> Vec<Arc<Node>> {
        let mut nodes: Vec<Arc<Node>> = self.nodes.read().await.values().cloned().collect();
        nodes.sort_by(|a, b| a.name().cmp(b.name()));
        nodes
    }

    /// Add newly seen hosts and refresh every node's credential list.
    ///
    /// Nodes are never removed. Fails without touching any node when a managed
    /// node has no credentials in the vault. Returns the number of nodes added.
    pub async fn apply_inventory(&self, inventory: &Inventory, vault: &Vault) -> Result<usize> {
        let modules = self.modules();
        let managed = inventory.managed_hosts(&modules)?;

        let mut nodes = self.nodes.write().await;
        let mut names: BTreeSet<String> = nodes.keys().cloned().collect();
        names.extend(managed.iter().map(|h| h.name.clone()));

        let mut credentials = HashMap::new();
        for name in &names {
            credentials.insert(name.clone(), vault.credentials_for(name)?);
        }

        let mut added = 0;
        for host in managed {
            if nodes.contains_key(&host.name) {
                continue;
            }
            let node = Node::new(host.name.clone(), host.target, self.connector.clone())
                .with_module(host.module)
                .with_poll_interval(self.poll_interval_seconds);
            debug!("{}: added node {}", node.uuid(), node.name());
            nodes.insert(host.name, Arc::new(node));
            added += 1;
        }

        if nodes.is_empty() {
            return Err(ExporterError::Config(
                "no host in the inventory is managed by this exporter".to_string(),
            ));
        }
        let refresh: Vec<(Arc<Node>, _)> = credentials
            .into_iter()
            .filter_map(|(name, list)| nodes.get(&name).map(|n| (n.clone(), list)))
            .collect();
        let total = nodes.len();
        drop(nodes);

        // Outside the map lock: a node may be in the middle of a gather cycle
        for (node, list) in refresh {
            node.set_credentials(list).await;
        }
        info!("Inventory applied: {} nodes ({} new)", total, added);
        Ok(added)
    }

    /// Expand the `subsystem` parameter into categories
    pub fn parse_subsystems(
        &self,
        value: Option<&str>,
    ) -> std::result::Result<Vec<Category>, RequestError> {
        match value {
            None | Some("") => Ok(vec![DEFAULT_SUBSYSTEM]),
            Some("all") => Ok(self.subsystems.iter().copied().collect()),
            Some(list) => list
                .split(',')
                .map(|name| {
                    Category::parse(name)
                        .filter(|c| self.subsystems.contains(c))
                        .ok_or_else(|| RequestError::UnsupportedSubsystem(name.to_string()))
                })
                .collect(),
        }
    }

    /// Validate a request and bind its selection onto the node
    pub async fn bind(
        &self,
        request: &ScrapeRequest,
    ) -> std::result::Result<Binding, RequestError> {
        if !self.authorize(request.token.as_deref()) {
            return Err(RequestError::Forbidden);
        }
        if self.nodes.read().await.is_empty() {
            return Err(RequestError::NoNodes);
        }

        let name = match request.node.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(RequestError::MissingNode),
        };
        let node = self
            .node(name)
            .await
            .ok_or_else(|| RequestError::UnknownNode(name.to_string()))?;

        let module = match request.module.as_deref() {
            Some(module) if !module.is_empty() => module,
            _ => return Err(RequestError::MissingModule),
        };
        if !self.modules.contains(module) {
            return Err(RequestError::UnsupportedModule(module.to_string()));
        }

        let subsystems = self.parse_subsystems(request.subsystem.as_deref())?;
        node.select(module, &subsystems).await;

        Ok(Binding {
            node,
            module: module.to_string(),
            subsystems,
        })
    }

    /// Serve one scrape: validate, gather (or reuse) and render the node's metrics
    pub async fn handle_scrape(
        &self,
        request: &ScrapeRequest,
    ) -> std::result::Result<String, RequestError> {
        let binding = self.bind(request).await?;
        let node = &binding.node;

        debug!(
            "{}: scrape of node '{}' with module '{}'",
            node.uuid(),
            node.name(),
            binding.module
        );
        let start = Instant::now();
        let metrics = node.collect().await;
        let body = metrics::render_snapshot(metrics)
            .map_err(|e| RequestError::Render(e.to_string()))?;
        debug!(
            "{}: scrape of node '{}', module '{}', subsystems {:?} took {:.3} seconds",
            node.uuid(),
            node.name(),
            binding.module,
            binding.subsystems,
            start.elapsed().as_secs_f64()
        );
        Ok(body)
    }
}
