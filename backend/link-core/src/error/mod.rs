pub mod codec;
pub mod config;
pub mod send;
pub mod session;
pub mod transport;

pub use codec::DecodeError;
pub use config::ConfigError;
pub use send::SendError;
pub use session::SessionError;
pub use transport::TransportError;
