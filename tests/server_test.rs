//! Server integration tests
//!
//! Tests for the HTML summary page and the HTTP mapping of rejections.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{node, FakeConnector, FakeDevice};
use network_exporter::dispatcher::{Dispatcher, RequestError, ScrapeRequest};
use network_exporter::server::{render_summary, router};
use secrecy::SecretString;
use std::sync::Arc;

async fn dispatcher_with_nodes(device: Arc<FakeDevice>, names: &[&str]) -> Arc<Dispatcher> {
    let dispatcher = Dispatcher::new(
        FakeConnector::new(device.clone()),
        vec!["cisco_nxos".to_string()],
        0,
    )
    .with_tokens(vec![SecretString::from("anonymous")]);
    for name in names {
        dispatcher.insert_node(node(name, device.clone(), 0)).await;
    }
    Arc::new(dispatcher)
}

#[tokio::test]
async fn test_summary_requires_token() {
    // Given: A dispatcher with a node
    let dispatcher = dispatcher_with_nodes(FakeDevice::accepting(&["good"]), &["ny-sw01"]).await;

    // When: Rendering the summary without and with a wrong token
    let missing = render_summary(&dispatcher, "/metrics", None).await;
    let wrong = render_summary(&dispatcher, "/metrics", Some("nope")).await;

    // Then: Both are forbidden
    assert_eq!(missing.unwrap_err(), RequestError::Forbidden);
    assert_eq!(wrong.unwrap_err(), RequestError::Forbidden);
}

#[tokio::test]
async fn test_summary_without_nodes_is_server_error() {
    let dispatcher = dispatcher_with_nodes(FakeDevice::accepting(&["good"]), &[]).await;

    let result = render_summary(&dispatcher, "/metrics", Some("anonymous")).await;

    assert_eq!(result.unwrap_err(), RequestError::NoNodes);
}

#[tokio::test]
async fn test_summary_lists_nodes_with_last_result() {
    // Given: Two nodes, one of which was scraped successfully
    let dispatcher =
        dispatcher_with_nodes(FakeDevice::accepting(&["good"]), &["ny-sw02", "ny-sw01"]).await;
    dispatcher
        .handle_scrape(&ScrapeRequest {
            token: Some("anonymous".to_string()),
            node: Some("ny-sw01".to_string()),
            module: Some("cisco_nxos".to_string()),
            subsystem: None,
        })
        .await
        .unwrap();

    // When: Rendering the summary
    let page = render_summary(&dispatcher, "/metrics", Some("anonymous"))
        .await
        .unwrap();

    // Then: Nodes are listed in name order with links and results
    let sw01 = page.find("<td>ny-sw01</td>").unwrap();
    let sw02 = page.find("<td>ny-sw02</td>").unwrap();
    assert!(sw01 < sw02);
    assert!(page.contains("/metrics?node=ny-sw01&module=cisco_nxos&x-token=anonymous"));
    assert!(page.contains(">success<"));
    assert!(page.contains("<td>interfaces</td>"));
    assert!(page.contains(">unknown<"));
}

#[test]
fn test_rejections_map_to_http_status() {
    let cases = [
        (RequestError::Forbidden, StatusCode::FORBIDDEN),
        (RequestError::NoNodes, StatusCode::INTERNAL_SERVER_ERROR),
        (RequestError::MissingNode, StatusCode::BAD_REQUEST),
        (
            RequestError::UnknownNode("x".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (RequestError::MissingModule, StatusCode::BAD_REQUEST),
        (
            RequestError::UnsupportedSubsystem("x".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            RequestError::Render("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];
    for (error, status) in cases {
        assert_eq!(error.into_response().status(), status);
    }
}

#[tokio::test]
async fn test_router_builds_with_custom_telemetry_path() {
    let dispatcher = dispatcher_with_nodes(FakeDevice::accepting(&["good"]), &["ny-sw01"]).await;

    // Building the router validates both routes
    let _router = router(dispatcher, "/probe");
}
