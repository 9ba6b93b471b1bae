//! Raw TCP delivery of ZPL to network label printers.
//!
//! Zebra-class printers accept a plain TCP stream on their raw port
//! (conventionally 9100) and interpret whatever arrives as ZPL. There is no
//! framing, no handshake and no acknowledgement, so delivery is:
//!
//! ```text
//! Idle ──▶ Connecting ──▶ Sending ──▶ Closed
//!              │             │
//!              └─────────────┴──▶ Failed
//! ```
//!
//! Each call opens its own connection and closes it when done. Nothing is
//! retried; a failure is returned to the caller as [`RelayError::DeliveryFailed`].

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, error, info};

use crate::directory::PrinterConfig;
use crate::error::{DeliveryCause, RelayError};

/// Raw print port used when the record leaves it unset.
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

/// Connect/write bound used when the record leaves it unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Port to connect to for `config`, falling back to [`DEFAULT_PRINTER_PORT`].
pub fn resolve_port(config: &PrinterConfig) -> u16 {
    if config.port == 0 {
        DEFAULT_PRINTER_PORT
    } else {
        config.port
    }
}

/// Bound for each network phase, falling back to [`DEFAULT_TIMEOUT_SECS`].
pub fn resolve_timeout(config: &PrinterConfig) -> Duration {
    if config.timeout_seconds == 0 {
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    } else {
        Duration::from_secs(config.timeout_seconds)
    }
}

/// Send a ZPL document to the printer described by `config`.
///
/// The payload is written as UTF-8 in full, then the connection is shut
/// down. Connecting (including name resolution) and writing are each bounded
/// by the printer's timeout.
///
/// # Errors
///
/// - [`RelayError::EmptyPayload`] if `payload` is empty (no connection is made)
/// - [`RelayError::DeliveryFailed`] on any connect or write failure
pub async fn send_zpl(config: &PrinterConfig, payload: &str) -> Result<(), RelayError> {
    if payload.is_empty() {
        return Err(RelayError::EmptyPayload);
    }

    let port = resolve_port(config);
    let timeout = resolve_timeout(config);
    let addr = format!("{}:{}", config.host, port);
    let data = payload.as_bytes();

    info!(
        printer = %config.name,
        addr = %addr,
        bytes = data.len(),
        "Sending ZPL to printer"
    );

    match deliver(&config.host, port, &addr, data, timeout).await {
        Ok(()) => {
            info!(printer = %config.name, addr = %addr, bytes = data.len(), "ZPL delivered");
            Ok(())
        }
        Err(cause) => {
            error!(
                printer = %config.name,
                addr = %addr,
                error = %cause,
                "Failed to deliver ZPL"
            );
            Err(RelayError::DeliveryFailed(cause))
        }
    }
}

/// Check that the printer accepts TCP connections, without sending anything.
pub async fn probe(config: &PrinterConfig) -> Result<(), RelayError> {
    let port = resolve_port(config);
    let timeout = resolve_timeout(config);
    let addr = format!("{}:{}", config.host, port);

    let stream = connect(&config.host, port, &addr, timeout).await?;
    drop(stream);
    debug!(printer = %config.name, addr = %addr, "Printer reachable");
    Ok(())
}

async fn deliver(
    host: &str,
    port: u16,
    addr: &str,
    data: &[u8],
    timeout: Duration,
) -> Result<(), DeliveryCause> {
    let mut stream = connect(host, port, addr, timeout).await?;

    let write = async {
        stream.write_all(data).await?;
        stream.flush().await?;
        stream.shutdown().await?;
        Ok::<(), std::io::Error>(())
    };

    tokio::time::timeout(timeout, write)
        .await
        .map_err(|_| DeliveryCause::WriteTimeout {
            addr: addr.to_string(),
            timeout,
        })?
        .map_err(|source| DeliveryCause::Write {
            addr: addr.to_string(),
            source,
        })
}

async fn connect(
    host: &str,
    port: u16,
    addr: &str,
    timeout: Duration,
) -> Result<TcpStream, DeliveryCause> {
    tokio::time::timeout(timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| DeliveryCause::ConnectTimeout {
            addr: addr.to_string(),
            timeout,
        })?
        .map_err(|source| DeliveryCause::Connect {
            addr: addr.to_string(),
            source,
        })
}
