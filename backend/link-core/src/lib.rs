pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod heartbeat;
pub mod reconcile;
pub mod router;
pub mod session;
pub mod state;

#[cfg(test)]
mod tests;

pub const DEFAULT_CONTROLLER_HOST: &str = "127.0.0.1";
pub const DEFAULT_CONTROLLER_PORT: u16 = 8000;
pub const WEBSOCKET_SCHEME: &str = "ws://";
pub const DEFAULT_CONTROLLER_URL: &str =
    const_format::concatcp!(WEBSOCKET_SCHEME, DEFAULT_CONTROLLER_HOST, ":", DEFAULT_CONTROLLER_PORT, "/");
