use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Device API error: {0}")]
    DeviceApi(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("All credentials rejected by node {node}")]
    AuthExhausted { node: String },

    #[error("Collection of {category} failed: {reason}")]
    CategoryCollectionFailed { category: String, reason: String },

    #[error("Device request timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
