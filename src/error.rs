use thiserror::Error;

use crate::domain::settings::SettingsKind;

/// Errors surfaced by the device link and the record codec.
#[derive(Debug, Error)]
pub enum LinkError {
    /// No device was selected or discovered within the discovery window.
    #[error("no KB1 device discovered")]
    DiscoveryFailed,

    /// Transport, service, or characteristic resolution failed while
    /// establishing the connection.
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    /// An operation was attempted while the link was not connected, or
    /// the connection dropped while the operation was in flight.
    #[error("device link is not connected")]
    NotConnected,

    /// A characteristic read or write failed while connected.
    #[error("transport error on {kind}: {reason}")]
    Transport { kind: SettingsKind, reason: String },

    /// Decode input was shorter than the record layout requires.
    #[error("record too short: expected {expected} bytes, got {actual}")]
    MalformedRecord { expected: usize, actual: usize },

    /// A write buffer did not match the record layout size.
    #[error("invalid record length: expected {expected} bytes, got {actual}")]
    InvalidArgument { expected: usize, actual: usize },
}
