use common::ErrorLocation;

use link_core::error::ConfigError;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors that stop the panel link from starting.
///
/// Startup failures are reported once on stderr and in the log file, so
/// they keep the structured shape and the location they were raised at.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum PanelLinkError {
    /// Error from this App
    #[error("Panel Link Error: {message} {location}")]
    PanelLink {
        message: String,
        location: ErrorLocation,
    },

    /// Configuration could not be loaded, validated or turned into a URL
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Async runtime could not be built
    #[error("Runtime Error: {message} {location}")]
    Runtime {
        message: String,
        location: ErrorLocation,
    },
}

impl From<ConfigError> for PanelLinkError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        PanelLinkError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
