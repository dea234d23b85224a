//! Controller connection lifecycle.
//!
//! A single background task owns the WebSocket to the controller. It
//! connects, serves the connection until it closes or errors, waits a fixed
//! retry interval, and starts over, forever. Everything it observes is
//! published as a [`ConnectionEvent`] stream.
//!
//! # Ownership
//!
//! - The task owns the only live socket; it is dropped on every exit path
//! - Each attempt gets a fresh, increasing [`ConnectionId`]
//! - Outbound frames go through the [`OutboundLink`] handed out with
//!   [`ConnectionEvent::Opened`], which stops accepting frames once its
//!   connection ends
//!
//! # Shutdown
//!
//! [`ConnectionHandle::shutdown`] (or dropping the handle) wakes the task
//! out of a pending connect, retry delay or receive immediately.

mod event;
mod handle;
mod link;
mod manager;

pub use event::{ConnectionEvent, ConnectionId, ConnectionState, ConnectionStatus};
pub use handle::ConnectionHandle;
pub use link::{NoLink, OutboundLink};
pub use manager::{ConnectionManager, ConnectionSettings};
