pub mod client;
pub mod connection;
pub mod types;

pub use client::{DeviceClient, DeviceConnector, JsonRpcClient, JsonRpcConnector, Protocol, Target};
pub use connection::ConnectionManager;
