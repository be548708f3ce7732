//! Error types for the core crate.

use thiserror::Error;

/// Signal-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("invalid or disconnected connection id")]
    InvalidConnection,
}

/// Property-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The value was rejected by the property's validator.
    #[error("invalid value for property `{name}`: {reason}")]
    InvalidValue {
        /// The property name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Async runtime errors.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The Tokio runtime could not be built.
    #[error("failed to create async runtime: {0}")]
    CreationFailed(#[from] std::io::Error),

    /// The global runtime was already initialized.
    #[error("global async runtime already initialized")]
    AlreadyInitialized,
}
