//! Shared primitives for the panel link.
//!
//! This crate holds the small building blocks every other crate leans on:
//! source-location capture for error values and the millisecond clock that
//! drives liveness evaluation.
//!
//! ## Architecture
//!
//! - **common** (this crate): Error locations, clock abstraction
//! - **models**: Wire schemas and the message-type registry
//! - **link-core**: Connection, routing, liveness and reconciliation logic
//! - **panel-link**: Binary wiring everything together

pub mod clock;
pub mod error;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use error::error_location::ErrorLocation;

#[cfg(test)]
mod tests;
