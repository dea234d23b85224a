//! Integration tests for link-core.
//!
//! Each test stands up a throwaway WebSocket controller on an ephemeral
//! localhost port and drives the real connection manager or session
//! against it.

mod connection;
mod helpers;
mod session;
