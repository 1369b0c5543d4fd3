//! Error message quality tests
//!
//! Tests that verify error messages are helpful and distinguishable.

use network_exporter::dispatcher::RequestError;
use network_exporter::error::ExporterError;

#[test]
fn test_auth_error_message_clarity() {
    // Given: An authentication error
    let error = ExporterError::Auth("credential for user admin rejected by device".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate authentication issue
    assert!(message.contains("Authentication failed"));
    assert!(message.contains("admin"));
}

#[test]
fn test_auth_exhausted_names_the_node() {
    // Given: A node whose credentials were all rejected
    let error = ExporterError::AuthExhausted {
        node: "ny-sw01".to_string(),
    };

    // When: Converting to string
    let message = error.to_string();

    // Then: The node is named
    assert!(message.contains("All credentials rejected"));
    assert!(message.contains("ny-sw01"));
}

#[test]
fn test_category_failure_names_category_and_reason() {
    // Given: A failed category collection
    let error = ExporterError::CategoryCollectionFailed {
        category: "vlans".to_string(),
        reason: "vlan.query: permission denied".to_string(),
    };

    // When: Converting to string
    let message = error.to_string();

    // Then: Both the category and the device reason are preserved
    assert!(message.contains("vlans"));
    assert!(message.contains("permission denied"));
}

#[test]
fn test_websocket_error_message_clarity() {
    // Given: A WebSocket error (needs a tungstenite::Error)
    use tungstenite::error::Error as WsError;
    use tungstenite::error::ProtocolError;

    let ws_err = WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake);
    let error = ExporterError::WebSocket(ws_err);

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate WebSocket issue
    assert!(message.contains("WebSocket error"));
}

#[test]
fn test_timeout_reports_seconds() {
    let message = ExporterError::Timeout(5).to_string();
    assert!(message.contains("timed out"));
    assert!(message.contains('5'));
}

#[test]
fn test_yaml_error_message_clarity() {
    // Given: A YAML parsing error
    let yaml_err = serde_yaml::from_str::<Vec<String>>("key: [unclosed").unwrap_err();
    let error = ExporterError::Yaml(yaml_err);

    // Then: Message should clearly indicate YAML issue
    assert!(error.to_string().starts_with("YAML error"));
}

#[test]
fn test_json_error_message_clarity() {
    // Given: A JSON parsing error
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let error = ExporterError::Json(json_err);

    // Then: Message should clearly indicate JSON issue
    assert!(error.to_string().contains("JSON error"));
}

#[test]
fn test_error_messages_are_distinguishable() {
    // Given: Different error types
    let auth_err = ExporterError::Auth("test".to_string()).to_string();
    let api_err = ExporterError::DeviceApi("test".to_string()).to_string();
    let config_err = ExporterError::Config("test".to_string()).to_string();
    let server_err = ExporterError::Server("test".to_string()).to_string();

    // Then: Each should have a unique prefix
    assert!(auth_err.starts_with("Authentication failed"));
    assert!(api_err.starts_with("Device API error"));
    assert!(config_err.starts_with("Configuration error"));
    assert!(server_err.starts_with("HTTP server error"));
    assert_ne!(auth_err, api_err);
    assert_ne!(api_err, config_err);
    assert_ne!(config_err, server_err);
}

#[test]
fn test_request_errors_name_the_offending_value() {
    // Given: Rejections carrying request values
    let node = RequestError::UnknownNode("ny-sw99".to_string()).to_string();
    let module = RequestError::UnsupportedModule("juniper_junos".to_string()).to_string();
    let subsystem = RequestError::UnsupportedSubsystem("lldp".to_string()).to_string();

    // Then: The offending value is echoed back
    assert!(node.contains("ny-sw99"));
    assert!(module.contains("juniper_junos"));
    assert!(subsystem.contains("lldp"));
    assert_eq!(RequestError::Forbidden.to_string(), "Forbidden");
}
