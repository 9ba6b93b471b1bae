use std::time::Duration;

use thiserror::Error;

/// Errors raised by the print relay when delivering ZPL to a printer
#[derive(Debug, Error)]
pub enum RelayError {
    /// Nothing to send; no connection was attempted
    #[error("No ZPL data to send to the printer")]
    EmptyPayload,

    /// Network failure while connecting to or writing to the printer
    #[error("Delivery failed: {0}")]
    DeliveryFailed(#[from] DeliveryCause),
}

/// The underlying transport failure behind [`RelayError::DeliveryFailed`].
#[derive(Debug, Error)]
pub enum DeliveryCause {
    /// Connect (including name resolution) did not finish in time
    #[error("connection to {addr} timed out after {}s", .timeout.as_secs())]
    ConnectTimeout { addr: String, timeout: Duration },

    /// Connect was refused, unreachable, or the host did not resolve
    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The payload could not be written in full before the deadline
    #[error("write to {addr} timed out after {}s", .timeout.as_secs())]
    WriteTimeout { addr: String, timeout: Duration },

    /// Write or shutdown failed part-way through
    #[error("write to {addr} failed: {source}")]
    Write {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the printer directory's backing store
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Printer name is empty
    #[error("Printer name must not be empty")]
    EmptyName,

    /// Printer host is empty
    #[error("Printer '{name}' has no host")]
    MissingHost { name: String },

    /// Printer token is empty
    #[error("Printer '{name}' has an empty token")]
    EmptyToken { name: String },

    /// Another record already uses this token. The token itself is never
    /// included in the message.
    #[error("Printer '{name}' reuses a token already assigned to '{existing}'")]
    DuplicateToken { name: String, existing: String },

    /// No record holds the given token (administrative update/remove)
    #[error("No printer is registered with that token")]
    UnknownToken,

    /// The directory file could not be read
    #[error("Failed to read printer directory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The directory file is not valid JSON for the expected layout
    #[error("Failed to parse printer directory {path}: {message}")]
    Parse { path: String, message: String },
}

/// Terminal outcomes of a webhook request other than success.
///
/// Each variant maps to a fixed plain-text response; the wrapped causes are
/// for server-side logs only.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No non-empty `token` parameter
    #[error("Missing token")]
    MissingToken,

    /// Token is unknown or belongs to an inactive printer
    #[error("Invalid token")]
    InvalidToken,

    /// Neither the body nor the `zpl` parameter produced any text
    #[error("Missing ZPL data")]
    MissingPayload,

    /// The relay could not deliver the document
    #[error("Error sending to printer: {0}")]
    DeliveryFailed(#[source] RelayError),

    /// The delivery task ended without reporting a result
    #[error("Print task aborted: {0}")]
    DeliveryAborted(String),

    /// The printer directory could not be read
    #[error("Printer directory unavailable: {0}")]
    DirectoryUnavailable(#[source] DirectoryError),
}
