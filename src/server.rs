//! HTTP Server
//!
//! This module implements the exporter's HTTP surface and the optional inventory
//! reload loop.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server; every request runs on its own task
//! - **Dispatcher**: Shared through `Arc`; nodes are polled on demand, there is no
//!   background collection
//! - **Reload Loop**: Background task re-reading inventory and vault every
//!   `reload_interval_seconds` (disabled when zero)
//!
//! # Endpoints
//!
//! - `GET <telemetry_path>?node=..&module=..&subsystem=..&x-token=..` - Metrics of one node
//! - `GET /` - HTML summary of all nodes (same token)
//!
//! The token is read from the `x-token` query parameter or the `X-Token` header.

use crate::config::Config;
use crate::dispatcher::{Dispatcher, RequestError, ScrapeRequest};
use crate::error::ExporterError;
use crate::inventory::{Inventory, Vault};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

const TOKEN_PARAM: &str = "x-token";

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
    telemetry_path: String,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Router serving the scrape and summary endpoints
pub fn router(dispatcher: Arc<Dispatcher>, telemetry_path: &str) -> Router {
    let state = AppState {
        dispatcher,
        telemetry_path: telemetry_path.to_string(),
    };
    Router::new()
        .route("/", get(summary_handler))
        .route(telemetry_path, get(scrape_handler))
        .with_state(state)
}

pub async fn start(config: Config, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    if config.inventory.reload_interval_seconds > 0 {
        let reload_dispatcher = dispatcher.clone();
        let reload_config = config.clone();
        tokio::spawn(async move {
            reload_inventory_loop(reload_config, reload_dispatcher).await;
        });
    }

    let app = router(dispatcher, &config.server.telemetry_path);

    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("failed to bind {}: {}", addr, e)))?;

    info!("Listening on {}", addr);
    info!(
        "Metrics available at http://{}{}",
        addr, config.server.telemetry_path
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Read inventory and vault from disk and apply them
pub async fn load_inventory(
    config: &Config,
    dispatcher: &Dispatcher,
) -> crate::error::Result<usize> {
    let inventory = Inventory::load(&config.inventory.inventory_file)?;
    let vault = Vault::load(&config.inventory.vault_file)?;
    dispatcher.apply_inventory(&inventory, &vault).await
}

async fn reload_inventory_loop(config: Config, dispatcher: Arc<Dispatcher>) {
    let mut ticker = interval(Duration::from_secs(
        config.inventory.reload_interval_seconds,
    ));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately and startup already loaded the inventory
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match load_inventory(&config, &dispatcher).await {
            Ok(added) => info!("Inventory reloaded, {} new nodes", added),
            Err(e) => error!("Failed to reload inventory: {}", e),
        }
    }
}

fn scrape_request(params: &HashMap<String, String>, headers: &HeaderMap) -> ScrapeRequest {
    let token = params.get(TOKEN_PARAM).cloned().or_else(|| {
        headers
            .get(TOKEN_PARAM)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });
    let node = params
        .get("target")
        .filter(|v| !v.is_empty())
        .or_else(|| params.get("node"))
        .cloned();

    ScrapeRequest {
        token,
        node,
        module: params.get("module").cloned(),
        subsystem: params.get("subsystem").cloned(),
    }
}

async fn scrape_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let request = scrape_request(&params, &headers);
    match state.dispatcher.handle_scrape(&request).await {
        Ok(body) => (
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!("Rejected scrape request for {:?}: {}", request.node, e);
            e.into_response()
        }
    }
}

async fn summary_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let request = scrape_request(&params, &headers);
    let no_cache = [(
        header::CACHE_CONTROL,
        "no-cache, max-age=0, must-revalidate, no-store",
    )];
    match render_summary(&state.dispatcher, &state.telemetry_path, request.token.as_deref()).await
    {
        Ok(page) => (no_cache, Html(page)).into_response(),
        Err(e) => (no_cache, e).into_response(),
    }
}

/// HTML table of every node with a link to its metrics
pub async fn render_summary(
    dispatcher: &Dispatcher,
    telemetry_path: &str,
    token: Option<&str>,
) -> Result<String, RequestError> {
    let token = match token {
        Some(token) if dispatcher.authorize(Some(token)) => token,
        _ => return Err(RequestError::Forbidden),
    };
    let nodes = dispatcher.nodes().await;
    if nodes.is_empty() {
        return Err(RequestError::NoNodes);
    }

    let mut page = String::from(
        "<html>\
         <head><title>Prometheus Exporter for Networking</title></head>\
         <body>\
         <h1>Prometheus Exporter for Networking</h1>\
         <table border='1'>\
         <tr><th>Node</th><th>Module</th><th>Subsystems</th><th>Last Result</th><th>Last Scrape</th><th>Metrics</th></tr>",
    );
    for node in nodes {
        let summary = node.summary().await;
        let color = match summary.last_result {
            crate::node::ScrapeResult::Success => "lightgreen",
            crate::node::ScrapeResult::Failure => "tomato",
            crate::node::ScrapeResult::Unknown => "lightgray",
        };
        let subsystems = summary
            .snapshot_subsystems
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}?node={}&module={}&{}={}",
            telemetry_path, summary.name, summary.module, TOKEN_PARAM, token
        );
        // Writing into a String cannot fail
        let _ = write!(
            page,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td style=\"background-color:{}\">{}</td><td>{}</td>\
             <td><a href='{}'>Metrics</a></td></tr>",
            summary.name,
            summary.module,
            subsystems,
            color,
            summary.last_result,
            summary.last_timestamp.as_deref().unwrap_or("unknown"),
            url
        );
    }
    page.push_str("</table></body></html>");
    Ok(page)
}
