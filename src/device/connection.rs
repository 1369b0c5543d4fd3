//! WebSocket Connection Management
//!
//! Holds the WebSocket session of one device client. A session is opened by
//! [`ConnectionManager::login`] and reused by every category query of the same
//! gather cycle. Requests are serialized through the connection mutex so that a
//! response is always read by the caller that sent the matching request.

use crate::device::client::{Protocol, Target};
use crate::device::types::{JsonRpcRequest, JsonRpcResponse};
use crate::error::{ExporterError, Result};
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct ConnectionManager {
    url: String,
    timeout: Duration,
    verify_tls: bool,
    connection: Mutex<Option<WsStream>>,
    request_id: AtomicU64,
}

impl ConnectionManager {
    pub fn new(target: &Target, timeout: Duration, verify_tls: bool) -> Self {
        let scheme = match target.protocol {
            Protocol::Http => "ws",
            Protocol::Https => "wss",
        };
        Self {
            url: format!("{}://{}/api/jsonrpc", scheme, target.authority()),
            timeout,
            verify_tls,
            connection: Mutex::new(None),
            request_id: AtomicU64::new(0),
        }
    }

    fn next_id(&self) -> String {
        self.request_id.fetch_add(1, Ordering::SeqCst).to_string()
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| ExporterError::Timeout(self.timeout.as_secs()))?
    }

    async fn connect_websocket(&self) -> Result<WsStream> {
        debug!("Connecting to {}", self.url);

        let (ws_stream, _) = if self.url.starts_with("wss") && !self.verify_tls {
            // Network gear commonly ships self-signed certificates
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|e| ExporterError::Config(e.to_string()))?;

            let connector = tokio_tungstenite::Connector::NativeTls(connector);
            tokio_tungstenite::connect_async_tls_with_config(&self.url, None, false, Some(connector))
                .await
                .map_err(|e| ExporterError::DeviceApi(format!("TLS connection failed: {}", e)))?
        } else {
            connect_async(&self.url)
                .await
                .map_err(ExporterError::WebSocket)?
        };

        Ok(ws_stream)
    }

    /// Open a new session and log in. Any previous session is dropped first.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let mut conn_guard = self.connection.lock().await;
        *conn_guard = None;

        let mut stream = self.bounded(self.connect_websocket()).await?;
        let params = serde_json::json!([username, password]);
        let result = self
            .bounded(self.round_trip(&mut stream, "auth.login", Some(params)))
            .await?;

        match result {
            serde_json::Value::Bool(true) => {
                *conn_guard = Some(stream);
                Ok(())
            }
            _ => {
                let _ = stream.close(None).await;
                Err(ExporterError::Auth(format!(
                    "credential for user {} rejected by device",
                    username
                )))
            }
        }
    }

    /// Execute a query on the logged-in session
    pub async fn execute_query<T>(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut conn_guard = self.connection.lock().await;
        let stream = conn_guard
            .as_mut()
            .ok_or_else(|| ExporterError::DeviceApi("No authenticated session".to_string()))?;

        match self.bounded(self.round_trip(stream, method, params)).await {
            Ok(result) => serde_json::from_value(result).map_err(ExporterError::Json),
            Err(e @ (ExporterError::WebSocket(_) | ExporterError::Timeout(_))) => {
                warn!("Dropping device session after transport failure: {}", e);
                *conn_guard = None;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn round_trip(
        &self,
        stream: &mut WsStream,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id(),
            method: method.to_string(),
            params,
        };

        let request_json = serde_json::to_string(&request)?;
        debug!("Sending request: {}", method);
        stream
            .send(Message::Text(request_json.into()))
            .await
            .map_err(ExporterError::WebSocket)?;

        while let Some(msg) = stream.next().await {
            let text = match msg.map_err(ExporterError::WebSocket)? {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };
            let response: JsonRpcResponse = serde_json::from_str(&text)?;
            if response.id.as_deref() != Some(request.id.as_str()) {
                debug!("Skipping unrelated message while waiting for {}", method);
                continue;
            }
            if let Some(error) = response.error {
                let reason = error
                    .message
                    .unwrap_or_else(|| format!("error code {}", error.code.unwrap_or_default()));
                return Err(ExporterError::DeviceApi(format!("{}: {}", method, reason)));
            }
            return response.result.ok_or_else(|| {
                ExporterError::DeviceApi(format!("{} returned no result", method))
            });
        }

        Err(ExporterError::DeviceApi(
            "Connection closed by device".to_string(),
        ))
    }
}
