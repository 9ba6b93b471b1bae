//! # ZPL Relay
//!
//! A webhook that forwards raw ZPL (Zebra Programming Language) documents to
//! network-attached label printers.
//!
//! Callers send ZPL to `/remote_zpl/print` together with a per-printer token.
//! The token selects a printer from the directory, and the document is written
//! verbatim to the printer's raw TCP port.
//!
//! ## Architecture
//!
//! - [`directory`] - Printer records and token lookup
//! - [`relay`] - Raw TCP delivery with timeouts
//! - [`payload`] - Request body decoding and parameter extraction
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use zpl_relay::{create_router, MemoryDirectory, PrinterConfig, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let directory = MemoryDirectory::with_printers([
//!         PrinterConfig::new("Shipping", "192.168.10.50", "k3x9-shipping"),
//!     ])
//!     .unwrap();
//!
//!     let router = create_router(directory, RouterConfig::new());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod payload;
pub mod relay;
pub mod server;

// Re-export commonly used types
pub use config::{CheckConfig, Cli, Command, ServeConfig};
pub use directory::{
    FileDirectory, MemoryDirectory, PrinterConfig, PrinterDirectory, PrinterFile, PrinterTable,
};
pub use error::{DeliveryCause, DirectoryError, RelayError, WebhookError};
pub use payload::{decode_body, PrintBody, PrintParams};
pub use relay::{
    probe, resolve_port, resolve_timeout, send_zpl, DEFAULT_PRINTER_PORT, DEFAULT_TIMEOUT_SECS,
};
pub use server::{
    create_router, health_handler, print_handler, AppState, HealthResponse, RouterConfig,
    PRINT_ROUTE,
};
